//! Terminal width probing

/// Columns taken by every table column except the command
const OTHER_COLUMNS: usize = 70;
/// Width assumed when stdout is not a terminal
const FALLBACK_WIDTH: usize = 120;
const MIN_COMMAND_LEN: usize = 10;

/// Width of the controlling terminal, if any
pub fn detect_width() -> Option<usize> {
    match crossterm::terminal::size() {
        Ok((columns, _)) if columns > 0 => Some(usize::from(columns)),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "No terminal size");
            None
        }
    }
}

/// Longest command line shown in tables for a terminal `width` columns wide
pub fn max_command_len(width: Option<usize>) -> usize {
    let width = width.or_else(detect_width).unwrap_or(FALLBACK_WIDTH);
    width.saturating_sub(OTHER_COLUMNS).max(MIN_COMMAND_LEN)
}
