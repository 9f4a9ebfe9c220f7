use thiserror::Error;

use crate::feature::Feature;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown canonical feature: {name}")]
    UnknownFeature { name: String },
    #[error("no source aliases configured for {feature}")]
    MissingAliases { feature: Feature },
    #[error("invalid feature map: {message}")]
    FeatureMapParse { message: String },
    #[error("unknown year outcome: {value}")]
    UnknownOutcome { value: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
