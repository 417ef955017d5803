pub mod columns;
pub mod enums;
pub mod error;
pub mod genomics;
pub mod schema;
pub mod thresholds;

pub use enums::{FileFormat, Strand, TaskKind};
pub use error::{ModelError, Result};
pub use genomics::{GeneAnnotation, GeneRecord, Variant, is_snp};
pub use schema::SchemaConfig;
pub use thresholds::{DistanceWindow, Label, LabelThresholds};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_serialize() {
        let thresholds = LabelThresholds::new(0.9, 0.01).expect("valid thresholds");
        let json = serde_json::to_string(&thresholds).expect("serialize thresholds");
        let round: LabelThresholds = serde_json::from_str(&json).expect("deserialize thresholds");
        assert_eq!(round, thresholds);
    }

    #[test]
    fn schema_round_trips_through_json() {
        let schema = SchemaConfig::identity(["chr", "start"], FileFormat::Tsv);
        let json = serde_json::to_string(&schema).expect("serialize schema");
        let round: SchemaConfig = serde_json::from_str(&json).expect("deserialize schema");
        assert_eq!(round.canonical_columns, schema.canonical_columns);
        assert_eq!(round.file_format, FileFormat::Tsv);
    }
}
