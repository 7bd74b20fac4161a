pub mod hud_overlay;
pub mod log_notifier;
