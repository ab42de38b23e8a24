// Keyboard shortcuts for the audio layer.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCommand {
    TogglePlayback,
    VolumeUp,
    VolumeDown,
}

#[inline]
pub fn audio_command_for_key(key: &str) -> Option<AudioCommand> {
    match key {
        "m" | "M" => Some(AudioCommand::TogglePlayback),
        "ArrowUp" => Some(AudioCommand::VolumeUp),
        "ArrowDown" => Some(AudioCommand::VolumeDown),
        _ => None,
    }
}

impl AudioCommand {
    /// Whether the key's browser default is suppressed. Arrow keys keep scrolling the page.
    #[inline]
    pub fn suppresses_default(self) -> bool {
        matches!(self, AudioCommand::TogglePlayback)
    }
}

/// Volume after a nudge, kept within [0, 1].
#[inline]
pub fn step_volume(current: f32, command: AudioCommand, step: f32) -> f32 {
    let next = match command {
        AudioCommand::VolumeUp => current + step,
        AudioCommand::VolumeDown => current - step,
        AudioCommand::TogglePlayback => current,
    };
    next.clamp(0.0, 1.0)
}
