use thiserror::Error;

/// Why a calculator refused to produce an estimate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EstimateError {
    #[error("`{field}` was given as zero")]
    ZeroQuantity { field: &'static str },
    #[error("{stage} is outside the supported numeric range")]
    OutOfRange { stage: &'static str },
}

impl EstimateError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ZeroQuantity { .. } => "The job size must be greater than zero.",
            Self::OutOfRange { .. } => {
                "Those numbers are too large for a ballpark estimate. Check the measurements and try again."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::EstimateError;

    #[test]
    fn zero_quantity_names_the_field() {
        let error = EstimateError::ZeroQuantity { field: "areaSqFt" };

        assert_eq!(error.to_string(), "`areaSqFt` was given as zero");
    }

    #[test]
    fn out_of_range_has_user_safe_message() {
        let error = EstimateError::OutOfRange { stage: "material quantity" };

        assert!(error.user_message().contains("too large"));
        assert_eq!(error.to_string(), "material quantity is outside the supported numeric range");
    }
}
