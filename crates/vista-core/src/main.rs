//! Drive the new tab search box from a terminal.
//!
//! Plain lines replace the field text. Lines starting with `:` are keys or
//! commands: `:down`, `:up`, `:tab`, `:stab`, `:esc`, `:enter`, `:click N`,
//! `:engine KEY`, `:engines`, `:list`, `:quit`.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use vista_core::{
    highlight, Config, HostCapabilities, Key, KeyPress, LocationAssign, Navigation, NewTab,
    SearchSession, SuggestionView,
};

struct StdoutLocation;

impl LocationAssign for StdoutLocation {
    fn assign(&self, url: &str) {
        println!("-> {}", url);
    }
}

fn print_view(view: &SuggestionView) {
    if !view.visible {
        println!("   ({}) {}", view.provider, view.text);
        return;
    }

    let typed = view.candidates.typed().unwrap_or_default();
    for (idx, candidate) in view.candidates.iter().enumerate() {
        let marker = if idx == view.active { '>' } else { ' ' };
        let h = highlight(candidate, typed);
        if h.matched.is_empty() {
            println!(" {} {}", marker, candidate);
        } else {
            println!(" {} {}[{}]{}", marker, h.before, h.matched, h.after);
        }
    }
}

fn press(search: &SearchSession, key: impl Into<KeyPress>) {
    search.key_down(key);
}

fn enter(search: &SearchSession) -> Option<Navigation> {
    search.key_down(Key::Enter);
    search.key_up(Key::Enter)
}

#[tokio::main]
async fn main() -> vista_core::Result<()> {
    vista_core::init_logging();

    let config_path = std::env::var_os("VISTA_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| Config::data_dir().join("config.json"));
    let config = Config::load_or_default(&config_path)?;

    let tab = NewTab::open(config, HostCapabilities::new(Arc::new(StdoutLocation)))?;
    let search = tab.search().clone();

    let mut views = search.subscribe();
    tokio::spawn(async move {
        let mut last = SuggestionView::default();
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            if view.candidates != last.candidates || view.active != last.active {
                print_view(&view);
            }
            last = view;
        }
    });

    search.focus();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = line.strip_prefix(':') else {
            search.input(line);
            continue;
        };

        let mut parts = command.splitn(2, ' ');
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).unwrap_or_default();

        let navigation = match name {
            "down" => {
                press(&search, Key::ArrowDown);
                None
            }
            "up" => {
                press(&search, Key::ArrowUp);
                None
            }
            "tab" => {
                press(&search, Key::Tab);
                None
            }
            "stab" => {
                press(&search, KeyPress::new(Key::Tab).with_shift());
                None
            }
            "esc" => {
                press(&search, Key::Escape);
                None
            }
            "enter" => enter(&search),
            "click" => match arg.parse::<usize>() {
                Ok(index) => search.click(index),
                Err(_) => {
                    eprintln!("usage: :click N");
                    None
                }
            },
            "engine" => {
                let provider = search.select_provider(arg);
                println!("   engine: {}", provider.name());
                None
            }
            "engines" => {
                for provider in search.registry().providers() {
                    let marker = if *provider == search.provider() { '*' } else { ' ' };
                    println!(" {} {:<12} {}", marker, provider.key(), provider.name());
                }
                None
            }
            "list" => {
                print_view(&search.snapshot());
                None
            }
            "quit" => break,
            other => {
                eprintln!("unknown command: :{}", other);
                None
            }
        };

        // Navigation replaces the page
        if navigation.is_some() {
            break;
        }
    }

    Ok(())
}
