use thiserror::Error;

/// Failures raised by profile construction, metrics and normalization.
///
/// A metric that is merely undefined for the curve shape (a missing crossing)
/// is reported as `NaN`, not as one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("profile needs at least one sample")]
    EmptyProfile,

    #[error("sample {index} is not finite")]
    NonFiniteSample { index: usize },

    #[error("profile has {actual} sample(s), at least {required} required")]
    TooFewSamples { required: usize, actual: usize },

    #[error("level {0} is outside [0, 1]")]
    LevelOutOfRange(f64),

    #[error("normalization window half-width {0} must be finite and positive")]
    InvalidWindow(f64),

    #[error("half-maximum crossing missing on at least one side of the profile")]
    MissingHalfMaximum,

    #[error("profile dose is constant, cannot be scaled")]
    FlatProfile,

    #[error("average dose over the normalization window is zero")]
    ZeroReferenceDose,

    #[error("entrance dose is zero, plateau ratio is undefined")]
    ZeroEntranceDose,

    #[error("in-place scaling of an integral dose buffer requires casting")]
    CastNotAllowed,

    #[error("profile has already been normalized")]
    AlreadyNormalized
}
