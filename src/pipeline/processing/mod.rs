// Pipeline processing: weighting, grouping and category merging

pub mod aggregate;
pub mod grouping;
pub mod merge;
pub mod numeric;
pub mod weighting;
