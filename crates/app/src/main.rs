#![forbid(unsafe_code)]

mod clipboard;
mod config;
mod service;
mod support;

use clipboard::SystemClipboard;
use config::AppConfig;
use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use log::{error, info, warn};
use seq_storage::CounterStore;
use service::{ClipboardSink, StampService};
use std::path::PathBuf;

const DEFAULT_STORAGE_DIR_NAME: &str = ".seqstamp";

fn usage() -> &'static str {
    "seq_app — durable sequence stamps on a global hotkey\n\n\
USAGE:\n\
  seq_app [--storage-dir DIR] [--hotkey COMBO] [--once | --count N]\n\n\
OPTIONS:\n\
  --storage-dir DIR  counter database directory\n\
                     (default: $SEQSTAMP_STORAGE_DIR, else ~/.seqstamp)\n\
  --hotkey COMBO     trigger binding, e.g. ctrl+q or ctrl+shift+F9\n\
                     (overrides the stored config for this run)\n\
  --once             trigger once, print the stamp to stdout, exit\n\
  --count N          trigger N times, print each stamp, exit\n\n\
NOTES:\n\
  - each trigger copies `yyyyMMdd-HHmmss-<sequence>` to the clipboard and\n\
    advances the persisted counter.\n\
  - without --once/--count the process stays resident and fires on the\n\
    registered hotkey.\n"
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug)]
struct CliArgs {
    storage_dir: PathBuf,
    hotkey_override: Option<String>,
    count: Option<u64>,
}

fn parse_args() -> Result<CliArgs, String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print!("{}", usage());
        std::process::exit(0);
    }

    let mut storage_dir: Option<PathBuf> = env_var("SEQSTAMP_STORAGE_DIR").map(PathBuf::from);
    let mut hotkey_override: Option<String> = None;
    let mut count: Option<u64> = None;

    let mut i = 0usize;
    while i < args.len() {
        let a = args[i].as_str();
        match a {
            "--storage-dir" => {
                i += 1;
                let v = args.get(i).ok_or("--storage-dir requires DIR")?;
                storage_dir = Some(PathBuf::from(v));
            }
            "--hotkey" => {
                i += 1;
                let v = args.get(i).ok_or("--hotkey requires COMBO")?;
                hotkey_override = Some(v.to_string());
            }
            "--once" => count = Some(1),
            "--count" => {
                i += 1;
                let v = args.get(i).ok_or("--count requires N")?;
                let n = v
                    .parse::<u64>()
                    .map_err(|_| "--count must be an integer")?;
                if n == 0 {
                    return Err("--count must be at least 1".to_string());
                }
                count = Some(n);
            }
            other => return Err(format!("Unknown arg: {other}\n\n{}", usage())),
        }
        i += 1;
    }

    Ok(CliArgs {
        storage_dir: storage_dir.unwrap_or_else(default_storage_dir),
        hotkey_override,
        count,
    })
}

fn default_storage_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) if !home.trim().is_empty() => {
            PathBuf::from(home).join(DEFAULT_STORAGE_DIR_NAME)
        }
        _ => PathBuf::from(DEFAULT_STORAGE_DIR_NAME),
    }
}

fn main() {
    env_logger::init();

    let args = parse_args().unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(2);
    });

    // Opened once here, dropped once at exit; no writes are in flight at
    // either point.
    let store = CounterStore::open(&args.storage_dir).unwrap_or_else(|e| {
        eprintln!(
            "cannot open counter store in {}: {e}",
            args.storage_dir.display()
        );
        std::process::exit(2);
    });
    info!(
        "counter store open in {}, next sequence {}",
        store.storage_dir().display(),
        store.current()
    );

    let app_config = match args.hotkey_override {
        Some(hotkey) => AppConfig { hotkey },
        None => config::load_or_init(store.storage_dir()).unwrap_or_else(|e| {
            eprintln!("{e}");
            std::process::exit(2);
        }),
    };

    let system_clipboard = SystemClipboard::new().unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(2);
    });
    let mut service = StampService::new(store, system_clipboard);

    if let Some(count) = args.count {
        run_batch(&mut service, count);
        return;
    }

    run_hotkey_loop(&mut service, &app_config.hotkey);
}

fn run_batch<C: ClipboardSink>(service: &mut StampService<C>, count: u64) {
    for _ in 0..count {
        match service.on_trigger(support::now_stamp_time()) {
            Ok(triggered) => {
                if let Some(err) = triggered.clipboard_error {
                    warn!("{err}");
                }
                println!("{}", triggered.stamp);
            }
            Err(e) => {
                eprintln!("trigger failed, sequence unchanged: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn run_hotkey_loop<C: ClipboardSink>(service: &mut StampService<C>, combo: &str) -> ! {
    let hotkey = combo.parse::<HotKey>().unwrap_or_else(|e| {
        eprintln!("invalid hotkey {combo:?}: {e}");
        std::process::exit(2);
    });

    // The manager must stay alive for the registration to hold.
    let manager = GlobalHotKeyManager::new().unwrap_or_else(|e| {
        eprintln!("hotkey manager init failed: {e}");
        std::process::exit(2);
    });
    manager.register(hotkey).unwrap_or_else(|e| {
        eprintln!("cannot register hotkey {combo:?}: {e}");
        std::process::exit(2);
    });
    info!("registered hotkey {combo}");

    // One event runs to completion before the next is read off the channel,
    // so increments never overlap.
    let receiver = GlobalHotKeyEvent::receiver();
    loop {
        let Ok(event) = receiver.recv() else {
            error!("hotkey event channel closed");
            std::process::exit(1);
        };
        if event.id != hotkey.id() || event.state != HotKeyState::Pressed {
            continue;
        }

        match service.on_trigger(support::now_stamp_time()) {
            Ok(triggered) => match triggered.clipboard_error {
                Some(err) => warn!("stamp {} produced but not copied: {err}", triggered.stamp),
                None => info!(
                    "copied {}, next sequence {}",
                    triggered.stamp,
                    service.current()
                ),
            },
            Err(e) => error!("trigger failed, sequence unchanged: {e}"),
        }
    }
}
