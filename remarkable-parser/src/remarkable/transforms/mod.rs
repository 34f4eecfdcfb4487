//! Transform pipeline infrastructure
//!
//! The stages of the library compose through a small, type-checked pipeline abstraction.
//! Any two transforms chain if the output of the first is the input of the second, so the
//! standard pipelines and custom ones (another tokenizer in front, a renderer at the end)
//! are built the same way.
//!
//! # Architecture Overview
//!
//! ## 1. The `Runnable` Trait
//!
//! The interface of every stage. A `Runnable<I, O>` turns an `I` into an `O`:
//!
//! ```rust,ignore
//! pub trait Runnable<I, O> {
//!     fn run(&self, input: I) -> Result<O, TransformError>;
//! }
//! ```
//!
//! ## 2. The `Transform<I, O>` Type
//!
//! A boxed, composable pipeline. `.then()` appends a stage, and the compiler checks that
//! the types line up:
//!
//! ```rust,ignore
//! let pipeline = Transform::from_fn(Ok)
//!     .then(DecodeTokens::new())      // String → Vec<Token>
//!     .then(ResolveMetadata::new())   // Vec<Token> → Vec<Token>
//!     .then(AssembleTree::new());     // Vec<Token> → DocumentTree
//! ```
//!
//! ## 3. Static Lazy Transforms
//!
//! The common pipelines are prebuilt as `once_cell::sync::Lazy` statics in [`standard`]:
//!
//! ```rust
//! use remarkable_parser::remarkable::token::Token;
//! use remarkable_parser::remarkable::transforms::standard::TOKENS_TO_TREE;
//!
//! let tokens = vec![Token::html("<!-- : resume -->")];
//! let tree = TOKENS_TO_TREE.run(tokens)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Organization
//!
//! - [`stages`]: individual stages (token decoding, metadata resolution, tree assembly)
//! - [`standard`]: prebuilt combinations

pub mod stages;
pub mod standard;

use thiserror::Error;

/// Error that can occur during transformation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// Generic error with message
    #[error("{0}")]
    Error(String),
    /// Stage failed with specific error
    #[error("Stage '{stage}' failed: {message}")]
    StageFailed { stage: String, message: String },
}

impl From<String> for TransformError {
    fn from(s: String) -> Self {
        TransformError::Error(s)
    }
}

impl From<&str> for TransformError {
    fn from(s: &str) -> Self {
        TransformError::Error(s.to_string())
    }
}

/// Trait for anything that can transform an input to an output
///
/// Implemented by the individual stages; [`Transform`] composes them.
pub trait Runnable<I, O> {
    /// Execute this transformation on the input
    fn run(&self, input: I) -> Result<O, TransformError>;
}

/// A composable transformation pipeline from `I` to `O`.
pub struct Transform<I, O> {
    run_fn: Box<dyn Fn(I) -> Result<O, TransformError> + Send + Sync>,
}

impl<I, O> Transform<I, O> {
    /// Create a transform from a function
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> Result<O, TransformError> + Send + Sync + 'static,
    {
        Transform {
            run_fn: Box::new(f),
        }
    }

    /// Chain a stage after this transform.
    ///
    /// The stage's input type must be this transform's output type.
    pub fn then<O2, S>(self, stage: S) -> Transform<I, O2>
    where
        S: Runnable<O, O2> + Send + Sync + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                stage.run(intermediate)
            }),
        }
    }

    /// Chain a prebuilt static transform after this one.
    pub fn then_transform<O2>(self, next: &'static Transform<O, O2>) -> Transform<I, O2>
    where
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                next.run(intermediate)
            }),
        }
    }

    /// Execute this transform on the given input
    pub fn run(&self, input: I) -> Result<O, TransformError> {
        (self.run_fn)(input)
    }
}

// Transforms are stages too, so prebuilt pipelines can be nested
impl<I, O> Runnable<I, O> for Transform<I, O>
where
    I: 'static,
    O: 'static,
{
    fn run(&self, input: I) -> Result<O, TransformError> {
        Transform::run(self, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DoubleNumber;
    impl Runnable<i32, i32> for DoubleNumber {
        fn run(&self, input: i32) -> Result<i32, TransformError> {
            Ok(input * 2)
        }
    }

    struct AddTen;
    impl Runnable<i32, i32> for AddTen {
        fn run(&self, input: i32) -> Result<i32, TransformError> {
            Ok(input + 10)
        }
    }

    struct IntToString;
    impl Runnable<i32, String> for IntToString {
        fn run(&self, input: i32) -> Result<String, TransformError> {
            Ok(input.to_string())
        }
    }

    struct FailingStage;
    impl Runnable<i32, i32> for FailingStage {
        fn run(&self, _input: i32) -> Result<i32, TransformError> {
            Err(TransformError::Error("intentional failure".to_string()))
        }
    }

    #[test]
    fn test_transform_from_fn() {
        let transform = Transform::from_fn(|x: i32| Ok(x * 2));
        assert_eq!(transform.run(5).unwrap(), 10);
    }

    #[test]
    fn test_multiple_stages() {
        let transform = Transform::from_fn(|x: i32| Ok(x))
            .then(DoubleNumber)
            .then(AddTen)
            .then(DoubleNumber);

        // (5 * 2) + 10 = 20, then 20 * 2 = 40
        assert_eq!(transform.run(5).unwrap(), 40);
    }

    #[test]
    fn test_type_changing_stage() {
        let transform = Transform::from_fn(|x: i32| Ok(x))
            .then(DoubleNumber)
            .then(IntToString);

        assert_eq!(transform.run(5).unwrap(), "10");
    }

    #[test]
    fn test_error_stops_the_pipeline() {
        let transform = Transform::from_fn(|x: i32| Ok(x))
            .then(FailingStage)
            .then(AddTen);

        assert_eq!(
            transform.run(5).unwrap_err(),
            TransformError::Error("intentional failure".to_string())
        );
    }

    #[test]
    fn test_transforms_nest_as_stages() {
        let inner = Transform::from_fn(|x: i32| Ok(x)).then(AddTen);
        let outer = Transform::from_fn(|x: i32| Ok(x))
            .then(inner)
            .then(DoubleNumber);
        assert_eq!(outer.run(1).unwrap(), 22);
    }

    #[test]
    fn test_error_display() {
        let err = TransformError::Error("test error".to_string());
        assert_eq!(format!("{}", err), "test error");

        let stage_err = TransformError::StageFailed {
            stage: "decoding".to_string(),
            message: "expected value".to_string(),
        };
        assert_eq!(
            format!("{}", stage_err),
            "Stage 'decoding' failed: expected value"
        );
    }

    #[test]
    fn test_error_conversion() {
        let err1: TransformError = "string error".into();
        assert_eq!(err1, TransformError::Error("string error".to_string()));

        let err2: TransformError = "owned string".to_string().into();
        assert_eq!(err2, TransformError::Error("owned string".to_string()));
    }
}
