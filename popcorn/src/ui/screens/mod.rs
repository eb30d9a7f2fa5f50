pub mod home_screen;
pub mod logs_screen;

use crate::state::LogsState;

#[derive(Debug, Clone)]
pub enum Screen {
    Home,
    Logs(LogsState),
}
