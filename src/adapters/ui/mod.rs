pub mod banner;
pub mod progress;
pub mod tui;

/// Calendar-page palette shared by the banner and the prompt theme.
pub(crate) mod palette {
    /// Holiday red (#d64545).
    pub const HOLIDAY_RED: (u8, u8, u8) = (0xd6, 0x45, 0x45);
    /// Marigold (#f2a541).
    pub const MARIGOLD: (u8, u8, u8) = (0xf2, 0xa5, 0x41);
    /// Faint ruling grey (#8c8c8c).
    pub const RULING_GREY: (u8, u8, u8) = (0x8c, 0x8c, 0x8c);
}

/// Banner first, then the prompt theme. Run once before the wizard starts.
pub fn init_ui() {
    banner::print_welcome();
    tui::apply_theme();
}
