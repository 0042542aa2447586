/// Failure of a built-in creation policy.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CreateError {
    AllocFailed {
        size: usize,
        align: usize,
    },
    InvalidLayout {
        size: usize,
        align: usize,
    },
}

impl core::fmt::Display for CreateError {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AllocFailed { size, align } => {
                write!(f, "allocation of {} bytes with alignment {} failed", size, align)
            },
            Self::InvalidLayout { size, align } => {
                write!(f, "invalid layout with size {} and alignment {}", size, align)
            },
        }
    }
}

impl core::error::Error for CreateError {}
