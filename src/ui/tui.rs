// src/ui/tui.rs
//! Terminal host for the picker dialog.
//!
//! Owns the terminal, the RPC client and the session cache, feeds events
//! into the reducer and carries out its effects. The save entry point
//! chains the overwrite-checking save flow behind the dialog, with the
//! confirmation rendered as an overlay.

use std::{
    io,
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::{
    event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Paragraph, TableState},
    Frame, Terminal,
};

use crate::{
    app::{Effect, Focus, Modal, Mode, Picker, PickerEvent},
    cache::SessionCache,
    files::{FlowEffect, FlowEvent, FlowOutcome, SaveAscii},
    rpc::client::{FileService, RpcClient},
    rpc::protocol::RpcReply,
    ui::keybindings::key_to_event,
    ui::layout::compute_layout,
    ui::widgets::{render_breadcrumb, render_file_table, render_filename_field, render_modal},
};

/// How a dialog is opened.
pub struct DialogOptions {
    /// Sandbox-relative subfolder to start in.
    pub subdir: String,
    /// Extension filter, `"*.json"` style.
    pub ext: String,
    /// Show the create-folder tool.
    pub allow_mkdir: bool,
}

/// Flow request tags live above every picker generation.
const FLOW_TAG_BASE: u64 = 1 << 32;

/// Open a load dialog; returns the chosen sandbox-relative path.
pub fn run_load<S: FileService>(
    service: S,
    opts: &DialogOptions,
    cache: &mut SessionCache,
) -> Result<Option<String>> {
    run_dialog(service, opts, Mode::Load, None, cache)
}

/// Open a save dialog and, once a path is chosen, run the
/// existence-check/overwrite/save flow. Returns the saved path.
pub fn run_save<S: FileService>(
    service: S,
    opts: &DialogOptions,
    content: &str,
    cache: &mut SessionCache,
) -> Result<Option<String>> {
    run_dialog(service, opts, Mode::Save, Some(content), cache)
}

fn run_dialog<S: FileService>(
    service: S,
    opts: &DialogOptions,
    mode: Mode,
    save_content: Option<&str>,
    cache: &mut SessionCache,
) -> Result<Option<String>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = drive(service, opts, mode, save_content, cache, &mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn drive<S: FileService>(
    service: S,
    opts: &DialogOptions,
    mode: Mode,
    save_content: Option<&str>,
    cache: &mut SessionCache,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<Option<String>> {
    let mut client = RpcClient::spawn(service);
    let (mut picker, effects) = Picker::open(&opts.subdir, &opts.ext, mode, opts.allow_mkdir, cache);

    let mut chosen: Option<String> = None;
    let mut outcome: Option<String> = None;
    let mut save_flow: Option<SaveAscii> = None;
    let mut flow_tag = FLOW_TAG_BASE;
    let mut flow_done = false;
    let mut dialog_open = true;

    apply_picker_effects(
        effects,
        &mut client,
        &mut chosen,
        &mut dialog_open,
        Instant::now(),
    )?;

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| draw(f, &picker))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_default();
        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let now = Instant::now();
                    if matches!(picker.modal, Some(Modal::ConfirmOverwrite { .. })) {
                        handle_overwrite_key(
                            &key,
                            &mut picker,
                            &mut save_flow,
                            &mut client,
                            &mut flow_tag,
                            &mut outcome,
                            &mut flow_done,
                            now,
                        )?;
                    } else if save_flow.is_some() && picker.modal.is_some() {
                        // Alerts raised by the save flow arrive after the
                        // picker has closed; dismiss them here.
                        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                            picker.modal = None;
                        }
                    } else if let Some(ev) = key_to_event(&key) {
                        let effects = picker.dispatch(ev, now, cache);
                        apply_picker_effects(
                            effects,
                            &mut client,
                            &mut chosen,
                            &mut dialog_open,
                            now,
                        )?;
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            let effects = picker.dispatch(PickerEvent::Tick, last_tick, cache);
            apply_picker_effects(effects, &mut client, &mut chosen, &mut dialog_open, last_tick)?;
        }

        // Route RPC completions: flow tags to the save flow, the rest to
        // the picker.
        let now = Instant::now();
        for completion in client.poll(now) {
            if completion.tag >= FLOW_TAG_BASE {
                let ev = match completion.result {
                    Ok(reply) => FlowEvent::Reply(reply),
                    Err(err) => FlowEvent::Failed(err.to_string()),
                };
                if let Some(flow) = save_flow.as_mut() {
                    let effects = flow.on_event(ev);
                    apply_flow_effects(
                        effects,
                        &mut picker,
                        &mut client,
                        &mut flow_tag,
                        &mut outcome,
                        &mut flow_done,
                        now,
                    )?;
                }
            } else {
                let ev = match completion.result {
                    Ok(RpcReply::ListFiles(reply)) => Some(PickerEvent::ListingArrived {
                        generation: completion.tag,
                        reply,
                    }),
                    Ok(_) => None, // mkdir acknowledgements
                    Err(err) => Some(PickerEvent::RpcFailed {
                        generation: completion.tag,
                        error: err.to_string(),
                    }),
                };
                if let Some(ev) = ev {
                    let effects = picker.dispatch(ev, now, cache);
                    apply_picker_effects(effects, &mut client, &mut chosen, &mut dialog_open, now)?;
                }
            }
        }

        // A resolved save dialog starts the overwrite-checking flow.
        if let (Some(path), Some(content)) = (chosen.clone(), save_content) {
            if save_flow.is_none() && mode == Mode::Save {
                match SaveAscii::start(&path, content, None) {
                    Ok((flow, effects)) => {
                        save_flow = Some(flow);
                        apply_flow_effects(
                            effects,
                            &mut picker,
                            &mut client,
                            &mut flow_tag,
                            &mut outcome,
                            &mut flow_done,
                            now,
                        )?;
                    }
                    Err(FlowEffect::Warn(msg)) => {
                        picker.modal = Some(Modal::Alert(msg));
                        chosen = None;
                    }
                    Err(_) => {}
                }
            }
        }

        let finished = match (mode, save_content.is_some()) {
            // load dialogs end with the dialog itself
            (Mode::Load, _) | (Mode::Save, false) => !dialog_open,
            // save dialogs wait for the flow unless cancelled outright
            (Mode::Save, true) => {
                let cancelled = !dialog_open && chosen.is_none();
                (cancelled || flow_done) && picker.modal.is_none()
            }
        };
        if finished {
            break;
        }
    }

    Ok(match (mode, save_content.is_some()) {
        (Mode::Save, true) => outcome,
        _ => chosen,
    })
}

fn apply_picker_effects(
    effects: Vec<Effect>,
    client: &mut RpcClient,
    chosen: &mut Option<String>,
    dialog_open: &mut bool,
    now: Instant,
) -> Result<()> {
    for effect in effects {
        match effect {
            Effect::Rpc { tag, request } => client.send(tag, &request, now)?,
            Effect::Resolve(path) => *chosen = Some(path),
            Effect::Close => *dialog_open = false,
        }
    }
    Ok(())
}

fn apply_flow_effects(
    effects: Vec<FlowEffect>,
    picker: &mut Picker,
    client: &mut RpcClient,
    flow_tag: &mut u64,
    outcome: &mut Option<String>,
    flow_done: &mut bool,
    now: Instant,
) -> Result<()> {
    for effect in effects {
        match effect {
            FlowEffect::Rpc(request) => {
                *flow_tag += 1;
                client.send(*flow_tag, &request, now)?;
            }
            FlowEffect::AskOverwrite(path) => {
                picker.modal = Some(Modal::ConfirmOverwrite { path });
            }
            FlowEffect::Warn(message) => {
                picker.modal = Some(Modal::Alert(message));
            }
            FlowEffect::Done(FlowOutcome::Saved(path)) => {
                info!("saved {}", path);
                *outcome = Some(path);
                *flow_done = true;
            }
            FlowEffect::Done(other) => {
                info!("save flow ended: {:?}", other);
                *outcome = None;
                *flow_done = true;
            }
        }
    }
    Ok(())
}

fn handle_overwrite_key(
    key: &KeyEvent,
    picker: &mut Picker,
    save_flow: &mut Option<SaveAscii>,
    client: &mut RpcClient,
    flow_tag: &mut u64,
    outcome: &mut Option<String>,
    flow_done: &mut bool,
    now: Instant,
) -> Result<()> {
    let decision = match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(false),
        _ => None,
    };
    if let Some(flag) = decision {
        picker.modal = None;
        if let Some(flow) = save_flow.as_mut() {
            let effects = flow.on_event(FlowEvent::OverwriteDecision(flag));
            apply_flow_effects(effects, picker, client, flow_tag, outcome, flow_done, now)?;
        }
    }
    Ok(())
}

fn draw(f: &mut Frame<'_>, picker: &Picker) {
    let area = f.area();
    let layout = compute_layout(area, picker.mode == Mode::Save);

    render_breadcrumb(f, layout.breadcrumb, &picker.breadcrumb());

    let mut table_state = TableState::default();
    render_file_table(
        f,
        layout.table,
        &picker.rows,
        picker.sort,
        picker.selected,
        picker.typeahead.buffer(),
        picker.loading,
        &mut table_state,
    );

    if let Some(rect) = layout.filename {
        render_filename_field(f, rect, &picker.filename, picker.focus == Focus::Filename);
    }

    let hints = match picker.mode {
        Mode::Load => "Enter load  Esc cancel  F2/F3/F4 sort  Ctrl-n new folder",
        Mode::Save => "Enter save  Esc cancel  Tab field  F2/F3/F4 sort  Ctrl-n new folder",
    };
    f.render_widget(Paragraph::new(hints), layout.hints);

    if let Some(modal) = &picker.modal {
        render_modal(f, area, modal);
    }
}
