//! Region sound weather flags and their token codec.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Weather conditions under which a region sound may play.
    ///
    /// `NONE` is a sentinel of its own, not the empty set: it is what a
    /// document gets when none of its tokens were recognized.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct SoundFlags: u32 {
        const PLEASANT = 1 << 0;
        const CLOUDY = 1 << 1;
        const RAINY = 1 << 2;
        const SNOWY = 1 << 3;
        const NONE = 1 << 4;
    }
}

impl SoundFlags {
    /// Flags given to a newly created region sound when the document names none.
    pub const ALL_WEATHER: Self = Self::PLEASANT
        .union(Self::CLOUDY)
        .union(Self::RAINY)
        .union(Self::SNOWY);

    /// Looks up a single token. Case-sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Pleasant" => Some(Self::PLEASANT),
            "Cloudy" => Some(Self::CLOUDY),
            "Rainy" => Some(Self::RAINY),
            "Snowy" => Some(Self::SNOWY),
            _ => None,
        }
    }
}

/// Decodes a sequence of flag tokens.
///
/// Unknown tokens are ignored. If nothing was recognized the result is
/// exactly [`SoundFlags::NONE`].
pub fn decode_flags<I, S>(tokens: I) -> SoundFlags
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let flags = tokens
        .into_iter()
        .filter_map(|token| SoundFlags::from_token(token.as_ref()))
        .fold(SoundFlags::empty(), |acc, flag| acc | flag);

    if flags.is_empty() {
        SoundFlags::NONE
    } else {
        flags
    }
}

/// Decodes a whitespace-delimited token string, e.g. `"Pleasant Snowy"`.
pub fn decode_flag_string(tokens: &str) -> SoundFlags {
    decode_flags(tokens.split_whitespace())
}
