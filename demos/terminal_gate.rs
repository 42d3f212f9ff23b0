//! Terminal Gate Demo
//!
//! Walk an `@` around with the arrow keys or WASD, or click to teleport it.
//! Every move costs a correct answer. Ctrl+C quits.
//!
//! Run with: cargo run --example terminal_gate
//! Log to a file with: RUST_LOG=turn_gate=debug cargo run --example terminal_gate 2> gate.log

use std::io::{self, stdout, Write};
use std::rc::Rc;
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

use turn_gate::terminal::{Screen, TerminalDriver, TerminalGuard};
use turn_gate::{
    GateConfig, HostRegistry, InputInterceptor, MouseAction, RawInput, SurfaceHost, SystemClock,
    Timers,
};

struct Walker {
    x: u16,
    y: u16,
    moves: u32,
}

impl Walker {
    fn apply(&mut self, input: &RawInput, (width, height): (u16, u16)) -> bool {
        let (x, y) = match input {
            RawInput::Keyboard(key) if key.is_down() => match key.key.as_str() {
                "ArrowUp" | "w" => (self.x, self.y.saturating_sub(1)),
                "ArrowDown" | "s" => (self.x, self.y + 1),
                "ArrowLeft" | "a" => (self.x.saturating_sub(1), self.y),
                "ArrowRight" | "d" => (self.x + 1, self.y),
                _ => return false,
            },
            RawInput::Mouse(mouse) if mouse.action == MouseAction::Down => (mouse.x, mouse.y),
            _ => return false,
        };

        // Row 0 is the status line, the last row the notice bar
        let x = x.min(width.saturating_sub(1));
        let y = y.clamp(1, height.saturating_sub(2).max(1));
        if (x, y) == (self.x, self.y) {
            return false;
        }
        self.x = x;
        self.y = y;
        self.moves += 1;
        true
    }
}

fn draw(walker: &Walker, previous: (u16, u16), status: &str) -> io::Result<()> {
    let mut out = stdout();
    queue!(
        out,
        MoveTo(0, 0),
        Clear(ClearType::CurrentLine),
        Print(status),
        MoveTo(previous.0, previous.1),
        Print(" "),
        MoveTo(walker.x, walker.y),
        Print("@")
    )?;
    out.flush()
}

fn main() -> io::Result<()> {
    env_logger::init();

    let screen = Rc::new(Screen::stdout()?);
    let timers = Timers::new(Rc::new(SystemClock));
    let host = Rc::new(SurfaceHost::new("terminal"));
    let registry = HostRegistry::new();
    registry.register(host.clone());

    let driver = TerminalDriver::new(screen.clone(), host, timers);
    let config = GateConfig::default().with_prompt_timeout(Some(Duration::from_secs(15)));
    let attached = match InputInterceptor::attach(&registry, "terminal", driver.gate_builder().config(config)) {
        Ok(attached) => attached,
        Err(err) => {
            eprintln!("gate not installed: {err}");
            return Ok(());
        }
    };

    let _guard = TerminalGuard::enter()?;

    let mut walker = Walker { x: 2, y: 2, moves: 0 };
    draw(&walker, (walker.x, walker.y), "arrows/WASD to move, click to jump, Ctrl+C to quit")?;

    loop {
        let turn = driver.pump(Duration::from_millis(250))?;
        if turn.interrupted {
            break;
        }

        for delivered in &turn.delivered {
            let previous = (walker.x, walker.y);
            if walker.apply(&delivered.input, screen.size()) {
                let status = format!(
                    "moves: {}   gate: {:?}",
                    walker.moves,
                    attached.gate.phase()
                );
                draw(&walker, previous, &status)?;
            }
        }
    }

    attached.detach();
    Ok(())
}
