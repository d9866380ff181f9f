//! Feature preprocessing stage: numeric scaling and one-hot encoding.

mod fitted;
mod report;
mod transformer;

pub use fitted::{CategoricalFeature, FittedTransform, NumericFeature};
pub use report::{TransformReport, TransformerConfig, UnknownCategory};
pub use transformer::FeatureTransformer;
