use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RestTextureError {
    #[error("rest texture holds {found} bytes, store of {slots} slots needs {expected}")]
    LengthMismatch {
        slots: usize,
        expected: usize,
        found: usize,
    },

    #[error("rest texture has no CPU-side data")]
    MissingData,
}

#[derive(Debug, Error, PartialEq)]
pub enum MotionFieldError {
    #[error("motion field of {width}x{height} needs {expected} cells, got {found}")]
    CellCountMismatch {
        width: u32,
        height: u32,
        expected: usize,
        found: usize,
    },
}
