//! Machine type of a target application's executable.
//!
//! Values mirror the `Machine` field of the PE/COFF file header, so a probed
//! header maps directly with [`Architecture::from_machine`].
//!
//! # Example
//!
//! ```
//! use pppm_schema::Architecture;
//!
//! assert_eq!(Architecture::from_machine(0x8664), Architecture::X64);
//! assert_eq!("x86".parse::<Architecture>(), Ok(Architecture::X86));
//! ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, Default,
)]
#[repr(u16)]
pub enum Architecture {
    /// Unresolved sentinel. Never reported as a final architecture.
    #[default]
    Native = 0,
    /// Intel 386 (`IMAGE_FILE_MACHINE_I386`)
    #[serde(rename = "x86")]
    X86 = 0x014c,
    /// Intel Itanium (`IMAGE_FILE_MACHINE_IA64`)
    Itanium = 0x0200,
    /// AMD64 (`IMAGE_FILE_MACHINE_AMD64`)
    #[serde(rename = "x64")]
    X64 = 0x8664,
}

impl Architecture {
    /// Architectures offered when one has to be chosen interactively, preferred first.
    pub const SUPPORTED: [Self; 2] = [Self::X64, Self::X86];

    /// Map a PE machine-type value. Unknown values map to [`Architecture::Native`].
    pub fn from_machine(machine: u16) -> Self {
        match machine {
            0x014c => Self::X86,
            0x0200 => Self::Itanium,
            0x8664 => Self::X64,
            _ => Self::Native,
        }
    }

    /// The PE machine-type value.
    pub fn machine(self) -> u16 {
        self as u16
    }

    /// Whether this is still the unresolved sentinel.
    pub fn is_native(self) -> bool {
        self == Self::Native
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "Native",
            Self::X86 => "x86",
            Self::Itanium => "Itanium",
            Self::X64 => "x64",
        }
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Architecture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "x86" | "i386" => Ok(Self::X86),
            "itanium" | "ia64" => Ok(Self::Itanium),
            "x64" | "amd64" | "x86_64" => Ok(Self::X64),
            _ => Err(format!("Unknown architecture: {s}")),
        }
    }
}
