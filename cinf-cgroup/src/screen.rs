//! Fixed-layout monitor screen
//!
//! ```text
//! cinf PID [42] PPID [1] CMD [sleep 1000]
//!      UIDS [0 0 0 0] STATE [S (sleeping)]
//!      NAMESPACES [mnt:[4026531841] uts:[4026531838] ...]
//!
//! CONTROLFILE               VALUE
//! memory.usage_in_bytes     1056768
//! ```

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::monitor::MonitorFrame;

const HEADER: &str = "CONTROLFILE";
const COLUMN_GAP: usize = 5;
const TABLE_ROW: u16 = 4;

/// Repaint the whole screen with `frame`
///
/// The cursor is moved back to the top-left corner first, so consecutive
/// frames overwrite each other instead of scrolling.
pub fn render<W: Write>(out: &mut W, frame: &MonitorFrame) -> io::Result<()> {
    let process = &frame.process;
    let namespaces = frame
        .namespaces
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");

    queue!(
        out,
        MoveTo(0, 0),
        Clear(ClearType::FromCursorDown),
        Print("cinf "),
        SetBackgroundColor(Color::White),
        SetForegroundColor(Color::Black),
        Print(format!(
            "PID [{}] PPID [{}] CMD [{}]",
            process.pid, process.ppid, process.command
        )),
        ResetColor,
        MoveTo(0, 1),
        Print(format!(
            "     UIDS [{}] STATE [{}]",
            process.uids, process.state
        )),
        MoveTo(0, 2),
        Print(format!("     NAMESPACES [{namespaces}]")),
    )?;

    let width = frame
        .rows
        .iter()
        .map(|row| row.name.chars().count())
        .chain(std::iter::once(HEADER.len()))
        .max()
        .unwrap_or(HEADER.len())
        + COLUMN_GAP;

    queue!(
        out,
        MoveTo(0, TABLE_ROW),
        Print(format!("{HEADER:<width$}VALUE"))
    )?;

    for (line, row) in (TABLE_ROW + 1..).zip(&frame.rows) {
        let value = row.value.as_deref().unwrap_or("n/a");
        queue!(
            out,
            MoveTo(0, line),
            Print(format!("{:<width$}{value}", row.name))
        )?;
    }

    let below = u16::try_from(frame.rows.len())
        .map_or(u16::MAX, |rows| rows.saturating_add(TABLE_ROW + 2));
    queue!(out, MoveTo(0, below))?;
    out.flush()
}
