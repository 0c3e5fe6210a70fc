use dioxus::prelude::{use_signal, Signal};

use crate::ui::grid::GridModel;
use crate::usecase::services::browser_service::DataBrowser;

pub type Browser = DataBrowser<GridModel>;

pub struct AppState {
    /// Live session, or the message explaining why startup failed.
    pub browser: Signal<Result<Browser, String>>,
    /// Bumped when a column toggle is refused or fails so the picker remounts with
    /// the checkbox checked again.
    pub picker_revision: Signal<u64>,
    /// Bumped by "Limpar filtros"; multi-select boxes remount and drop
    /// their search term.
    pub clear_revision: Signal<u64>,
}

impl AppState {
    pub fn new(open: impl FnOnce() -> Result<Browser, String>) -> Self {
        Self {
            browser: use_signal(open),
            picker_revision: use_signal(|| 0_u64),
            clear_revision: use_signal(|| 0_u64),
        }
    }
}
