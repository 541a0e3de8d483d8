//! Command implementations

pub mod classify;
pub mod generate;
pub mod graph;

use girbind::resolver::GenError;
use girbind::util::diagnostic;

/// Print a resolution failure as a diagnostic when it carries one.
pub(crate) fn report_error(err: anyhow::Error, color: bool) -> anyhow::Error {
    if let Some(gen) = err.downcast_ref::<GenError>() {
        diagnostic::emit(&gen.to_diagnostic(), color);
    }
    err
}
