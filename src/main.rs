use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use indoc::indoc;
use ratatui::layout::Rect;

use popout::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use popout::drivers::{InputEvent, OutputDriver};
use popout::dom::{Document, LayoutBox, Viewport};
use popout::event_loop::{ControlFlow, EventLoop};
use popout::render::Renderer;
use popout::{Popout, PopoutConfig, PopoutError, tracing_sub};

const SAMPLES: [&str; 4] = [
    indoc! {"
        Quarterly report. Revenue grew in every region while costs held
        flat. Hover this panel and click the corner button to float it.
    "},
    indoc! {"
        Build log. 212 crates compiled, 0 warnings. Drag a floating window
        by its title bar and resize it from the bottom-right grip.
    "},
    indoc! {"
        Notes. Closing a window puts the panel back exactly where its
        placeholder stood.
    "},
    indoc! {"
        Scratch. The newest or most recently clicked window stays on top.
    "},
];

const PANEL_HEIGHT: i32 = 6;
const PANEL_GAP: i32 = 1;

#[derive(Parser, Debug)]
#[command(
    name = "popout",
    version = env!("CARGO_PKG_VERSION"),
    about = "Pop panels out into floating, draggable, resizable windows"
)]
struct Cli {
    /// How many sample panels to stack on the page.
    #[arg(short = 'p', long = "panels", value_name = "COUNT", default_value_t = 4)]
    panels: usize,

    /// Append debug logs to this file. Logging is discarded otherwise.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Idle tick interval in milliseconds. Drives redraws and the trigger's
    /// auto-hide.
    #[arg(long = "tick-ms", value_name = "MS", default_value_t = 16)]
    tick_ms: u64,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    tracing_sub::init_default(cli.log_file.as_deref())?;

    let mut output = ConsoleOutputDriver::new()?;
    let mut popout = build_page(cli.panels, output.size()?).map_err(io::Error::other)?;
    let renderer = Renderer::new();

    output.enter()?;
    let mut event_loop = EventLoop::new(
        ConsoleInputDriver::new(),
        Duration::from_millis(cli.tick_ms),
    );

    let result = event_loop.run(|input| {
        let now = Instant::now();
        match input {
            None => {
                popout.tick(now).map_err(io::Error::other)?;
                output.present(&renderer, &popout)?;
            }
            Some(InputEvent::Quit) => return Ok(ControlFlow::Quit),
            Some(InputEvent::Pointer(pointer)) => {
                if let Err(err) = pointer.apply(&mut popout, now) {
                    tracing::warn!(%err, "pointer dispatch failed");
                }
            }
            Some(InputEvent::Resize { width, height }) => {
                let viewport = popout.document_mut().viewport_mut();
                viewport.width = i32::from(width);
                viewport.height = i32::from(height);
            }
        }
        Ok(ControlFlow::Continue)
    });

    output.exit()?;
    result
}

/// A heading followed by bordered panels stacked in a column, each bound to
/// the hover trigger.
fn build_page(panels: usize, area: Rect) -> Result<Popout, PopoutError> {
    let mut doc = Document::new();
    *doc.viewport_mut() = Viewport::new(i32::from(area.width), i32::from(area.height));
    let body = doc.body();
    let width = (i32::from(area.width) - 4).clamp(16, 60);

    let heading = doc.create_text_element(
        "p",
        "popout demo: hover a panel, click its corner button. q quits.",
    );
    doc.append_child(body, heading)?;
    doc.set_layout(heading, LayoutBox::new(0, 2, width, 1), None)?;

    let mut targets = Vec::with_capacity(panels);
    for i in 0..panels {
        let text = SAMPLES[i % SAMPLES.len()].lines().collect::<Vec<_>>().join(" ");
        let panel = doc.create_text_element("div", text);
        doc.set_style_text(panel, "border: 1px solid; margin: 1px 0px 0px 0px;")?;
        doc.append_child(body, panel)?;
        let top = i32::try_from(i)
            .unwrap_or(i32::MAX)
            .saturating_mul(PANEL_HEIGHT + PANEL_GAP)
            .saturating_add(1 + PANEL_GAP);
        doc.set_layout(panel, LayoutBox::new(top, 2, width, PANEL_HEIGHT), None)?;
        targets.push(panel);
    }

    let mut popout = Popout::new(doc, PopoutConfig::terminal());
    for (i, panel) in targets.into_iter().enumerate() {
        popout.bind(panel, &format!("Panel {}", i + 1))?;
    }
    Ok(popout)
}
