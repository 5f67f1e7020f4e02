//! Output formatting

pub mod console;

/// Force colors off (`[output] color = false`); otherwise `colored` decides per terminal.
pub fn set_color(enabled: bool) {
    if !enabled {
        colored::control::set_override(false);
    }
}
