//! DLNA content-feature values for streamed resources
//!
//! The `DLNA.ORG_FLAGS` field is built by summing named flag weights. Each
//! weight occupies its own decimal digit position, so the sum reads as a
//! concatenation of independent fields. The 8-digit primary flag word is
//! followed by 24 reserved zero digits.

use std::fmt;

/// Named `DLNA.ORG_FLAGS` capability flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentFlag {
    SenderPaced,
    LsopTimeBasedSeekSupported,
    LsopByteBasedSeekSupported,
    PlayContainerSupported,
    S0IncreasingSupported,
    SnIncreasingSupported,
    RtspPauseSupported,
    StreamingTransferModeSupported,
    InteractiveTransferModeSupported,
    BackgroundTransferModeSupported,
    ConnectionStallingSupported,
    DlnaVersion15Supported,
}

impl ContentFlag {
    pub const ALL: [ContentFlag; 12] = [
        ContentFlag::SenderPaced,
        ContentFlag::LsopTimeBasedSeekSupported,
        ContentFlag::LsopByteBasedSeekSupported,
        ContentFlag::PlayContainerSupported,
        ContentFlag::S0IncreasingSupported,
        ContentFlag::SnIncreasingSupported,
        ContentFlag::RtspPauseSupported,
        ContentFlag::StreamingTransferModeSupported,
        ContentFlag::InteractiveTransferModeSupported,
        ContentFlag::BackgroundTransferModeSupported,
        ContentFlag::ConnectionStallingSupported,
        ContentFlag::DlnaVersion15Supported,
    ];

    pub fn weight(self) -> u64 {
        match self {
            ContentFlag::SenderPaced => 80_000_000,
            ContentFlag::LsopTimeBasedSeekSupported => 40_000_000,
            ContentFlag::LsopByteBasedSeekSupported => 20_000_000,
            ContentFlag::PlayContainerSupported => 10_000_000,
            ContentFlag::S0IncreasingSupported => 8_000_000,
            ContentFlag::SnIncreasingSupported => 4_000_000,
            ContentFlag::RtspPauseSupported => 2_000_000,
            ContentFlag::StreamingTransferModeSupported => 1_000_000,
            ContentFlag::InteractiveTransferModeSupported => 800_000,
            ContentFlag::BackgroundTransferModeSupported => 400_000,
            ContentFlag::ConnectionStallingSupported => 200_000,
            ContentFlag::DlnaVersion15Supported => 100_000,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ContentFlag::SenderPaced => "SENDER_PACED",
            ContentFlag::LsopTimeBasedSeekSupported => "LSOP_TIME_BASED_SEEK_SUPPORTED",
            ContentFlag::LsopByteBasedSeekSupported => "LSOP_BYTE_BASED_SEEK_SUPPORTED",
            ContentFlag::PlayContainerSupported => "PLAY_CONTAINER_SUPPORTED",
            ContentFlag::S0IncreasingSupported => "S0_INCREASING_SUPPORTED",
            ContentFlag::SnIncreasingSupported => "SN_INCREASING_SUPPORTED",
            ContentFlag::RtspPauseSupported => "RTSP_PAUSE_SUPPORTED",
            ContentFlag::StreamingTransferModeSupported => "STREAMING_TRANSFER_MODE_SUPPORTED",
            ContentFlag::InteractiveTransferModeSupported => "INTERACTIVE_TRANSFER_MODE_SUPPORTED",
            ContentFlag::BackgroundTransferModeSupported => "BACKGROUND_TRANSFER_MODE_SUPPORTED",
            ContentFlag::ConnectionStallingSupported => "CONNECTION_STALLING_SUPPORTED",
            ContentFlag::DlnaVersion15Supported => "DLNA_VERSION_15_SUPPORTED",
        }
    }

    /// Look a flag up by its protocol name, e.g. `"DLNA_VERSION_15_SUPPORTED"`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.name() == name)
    }
}

impl fmt::Display for ContentFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Transport capabilities of one streamed resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFeatures {
    pub support_time_seek: bool,
    pub support_range: bool,
    pub transcoded: bool,
    flags: Vec<ContentFlag>,
}

impl ContentFeatures {
    /// Features with the given flags and all prefix booleans off
    pub fn new(flags: impl IntoIterator<Item = ContentFlag>) -> Self {
        flags
            .into_iter()
            .fold(Self::default(), |features, flag| features.with_flag(flag))
    }

    /// Features advertised for a live stream pushed to a renderer
    pub fn live_stream() -> Self {
        Self::new([
            ContentFlag::StreamingTransferModeSupported,
            ContentFlag::BackgroundTransferModeSupported,
            ContentFlag::ConnectionStallingSupported,
            ContentFlag::DlnaVersion15Supported,
        ])
    }

    /// Add a flag; flags already present are not counted twice
    pub fn with_flag(mut self, flag: ContentFlag) -> Self {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
        self
    }

    pub fn flags(&self) -> &[ContentFlag] {
        &self.flags
    }

    /// Arithmetic sum of the selected flag weights
    pub fn flag_word(&self) -> u64 {
        self.flags.iter().map(|flag| flag.weight()).sum()
    }

    /// The `DLNA.ORG_FLAGS` value: zero-padded flag word plus 24 reserved zeros
    pub fn flags_field(&self) -> String {
        format!("{:08}{}", self.flag_word(), "0".repeat(24))
    }
}

impl fmt::Display for ContentFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bit = |value: bool| if value { '1' } else { '0' };
        write!(
            f,
            "DLNA.ORG_OP={}{};DLNA.ORG_CI={};DLNA.ORG_FLAGS={}",
            bit(self.support_time_seek),
            bit(self.support_range),
            bit(self.transcoded),
            self.flags_field()
        )
    }
}
