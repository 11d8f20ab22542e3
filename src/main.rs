// src/main.rs
//! Demo binary: browse a local directory through the sandboxed RPC
//! service and load (or save into) the picked file.
//!
//! Usage: fpick [ROOT] [--dir SUBDIR] [--ext FILTER] [--save]

use std::env;

use anyhow::{anyhow, Result};
use log::debug;

use fpick::{
    cache::SessionCache,
    files::{parse_json_content, FlowEffect, FlowEvent, FlowOutcome, LoadAscii},
    rpc::client::FileService,
    rpc::local::LocalSandbox,
    ui::{run_load, run_save, DialogOptions},
};

struct Args {
    root: String,
    subdir: String,
    ext: String,
    save: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        root: ".".to_string(),
        subdir: String::new(),
        ext: "*".to_string(),
        save: false,
    };
    let mut it = env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--save" => args.save = true,
            "--dir" => {
                args.subdir = it.next().ok_or_else(|| anyhow!("--dir needs a value"))?;
            }
            "--ext" => {
                args.ext = it.next().ok_or_else(|| anyhow!("--ext needs a value"))?;
            }
            other if !other.starts_with('-') => args.root = other.to_string(),
            other => return Err(anyhow!("unknown option: {}", other)),
        }
    }
    Ok(args)
}

/// Drive a load flow to completion against the service, no UI involved.
fn load_blocking(service: &mut LocalSandbox, path: &str) -> Result<FlowOutcome> {
    let (mut flow, mut pending) = LoadAscii::start(path).map_err(|effect| match effect {
        FlowEffect::Warn(msg) => anyhow!(msg),
        other => anyhow!("load failed: {:?}", other),
    })?;
    loop {
        let mut next = Vec::new();
        for effect in pending {
            match effect {
                FlowEffect::Rpc(request) => {
                    debug!("calling {}", request.method());
                    let event = match service.call(&request) {
                        Ok(reply) => FlowEvent::Reply(reply),
                        Err(err) => FlowEvent::Failed(err.to_string()),
                    };
                    next.extend(flow.on_event(event));
                }
                FlowEffect::Warn(message) => eprintln!("{}", message),
                FlowEffect::Done(outcome) => return Ok(outcome),
                // load flows never ask about overwriting
                FlowEffect::AskOverwrite(_) => {}
            }
        }
        if next.is_empty() {
            return Ok(FlowOutcome::Failed);
        }
        pending = next;
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;
    let mut cache = SessionCache::default();
    let opts = DialogOptions {
        subdir: args.subdir.clone(),
        ext: args.ext.clone(),
        allow_mkdir: true,
    };

    if args.save {
        let content = "{\n  \"saved_by\": \"fpick\"\n}\n";
        let service = LocalSandbox::new(&args.root);
        match run_save(service, &opts, content, &mut cache)? {
            Some(path) => println!("saved {}", path),
            None => println!("save cancelled"),
        }
        return Ok(());
    }

    let service = LocalSandbox::new(&args.root);
    let Some(path) = run_load(service, &opts, &mut cache)? else {
        println!("no file chosen");
        return Ok(());
    };

    let mut service = LocalSandbox::new(&args.root);
    match load_blocking(&mut service, &path)? {
        FlowOutcome::Loaded(content) => {
            println!("loaded {} ({} bytes)", path, content.len());
            if path.ends_with(".json") {
                match parse_json_content(&content) {
                    Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                    Err(err) => eprintln!("not valid JSON: {}", err),
                }
            } else {
                print!("{}", content);
            }
        }
        FlowOutcome::NotFound => println!("{} does not exist", path),
        other => println!("load ended: {:?}", other),
    }
    Ok(())
}
