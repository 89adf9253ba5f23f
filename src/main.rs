use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use eureka_ui::constants::DEFAULT_TICK;
use eureka_ui::demo::{PageOptions, SearchPage};
use eureka_ui::dom::Dom;
use eureka_ui::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use eureka_ui::drivers::{InputDriver, OutputDriver};
use eureka_ui::event_loop::{ControlFlow, EventLoop};
use eureka_ui::host::Host;
use eureka_ui::tracing_sub;

#[derive(Parser, Debug)]
#[command(
    name = "eureka-ui",
    version = env!("CARGO_PKG_VERSION"),
    about = "Code-search page demo: combo box, filters, splitter and dialogs in the terminal"
)]
struct Cli {
    /// Write debug logs to this file. Logs are discarded otherwise.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Comma-separated search suggestions for the combo box.
    #[arg(
        long = "suggestions",
        value_name = "LIST",
        value_delimiter = ',',
        default_value = "SearchEngine,SearchService,GitService,IndexStatus,CommitHeader"
    )]
    suggestions: Vec<String>,

    /// Accept search text that matches no suggestion.
    #[arg(long = "free-text")]
    free_text: bool,

    /// Host tick in milliseconds; bounds how late a timer can fire.
    #[arg(long = "tick-ms", value_name = "MS")]
    tick_ms: Option<u64>,
}

impl Cli {
    fn tick(&self) -> Duration {
        self.tick_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TICK)
            .max(Duration::from_millis(1))
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    tracing_sub::init_default(cli.log_file.as_deref())?;

    let dom = Dom::new();
    let page = SearchPage::mount(
        &dom,
        PageOptions {
            suggestions: cli
                .suggestions
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            free_text: cli.free_text,
            extensions: vec![".java".into(), ".ts".into(), ".tsx".into(), ".rs".into()],
        },
    )
    .map_err(io::Error::other)?;

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut host = Host::new(dom);
    let (width, height) = output.size()?;
    host.resize(width, height);
    page.fit(host.dom());

    let mut input = ConsoleInputDriver::new();
    input.set_mouse_capture(true)?;
    let timers = host.dom().clone();
    let mut event_loop =
        EventLoop::new(input, cli.tick()).with_wake(move || timers.next_timer_delay());
    let result = event_loop.run(|_, event| {
        match event {
            Some(event) => {
                let resized = matches!(event, crossterm::event::Event::Resize(..));
                if host.handle_event(&event) == ControlFlow::Quit {
                    return Ok(ControlFlow::Quit);
                }
                if resized {
                    page.fit(host.dom());
                }
            }
            None => {
                host.tick();
                output.draw(|frame| host.draw(frame))?;
            }
        }
        Ok(ControlFlow::Continue)
    });

    output.exit()?;
    tracing::debug!("exiting");
    result
}
