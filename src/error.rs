use thiserror::Error;

/// Top-level error type for the geocore kernel.
#[derive(Debug, Error)]
pub enum GeoCoreError {
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Errors raised while constructing or parsing coordinate values.
#[derive(Debug, Error)]
pub enum CoordinateError {
    #[error("{coordinate} {value} dm7 is out of range [{min}, {max}]")]
    OutOfRange {
        coordinate: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("cannot parse `{text}` as {expected}")]
    Parse {
        text: String,
        expected: &'static str,
    },
}

/// Errors raised by geometric constructions and operations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("at least one location is required")]
    EmptyLocationSequence,

    #[error("a multipolygon requires at least one outer ring")]
    EmptyMultiPolygon,

    #[error("location index {index} is out of bounds for a polyline of {len} locations")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("heading between identical locations {location} is undefined")]
    UndefinedHeading { location: String },

    #[error("cannot join polylines: endpoint {expected} does not match {found}")]
    MismatchedEndpoints { expected: String, found: String },

    #[error(
        "truncating {from_start} leading and {from_end} trailing locations \
         would empty a polyline of {len} locations"
    )]
    InvalidTruncation {
        from_start: usize,
        from_end: usize,
        len: usize,
    },

    #[error("offset ratio {ratio} is outside [0, 1]")]
    OffsetOutOfRange { ratio: f64 },

    #[error("rectangle corners are inverted: {lower_left} is not south-west of {upper_right}")]
    InvertedCorners {
        lower_left: String,
        upper_right: String,
    },
}

/// Errors raised by the polyline compression codecs.
///
/// [`CodecError::DeltaExceedsMaximum`] is deliberately distinct from the
/// generic validation errors: it signals a data-precision problem in
/// otherwise well-formed input, not a programming mistake.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("longitude delta {delta} dm7 exceeds the maximum representable delta {max} dm7")]
    DeltaExceedsMaximum { delta: i64, max: i64 },

    #[error("compressed polyline ends in the middle of a value")]
    Truncated,

    #[error("invalid character {character:?} in compressed polyline")]
    InvalidCharacter { character: char },

    #[error("delta stream is malformed: {0}")]
    Malformed(String),
}

/// Convenience type alias for results using [`GeoCoreError`].
pub type Result<T> = std::result::Result<T, GeoCoreError>;
