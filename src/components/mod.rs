pub mod modal;
pub mod webhook_panel;
