//! Command/query structs exchanged between the REST layer and the domain
//! services. DTO parsing stays in `rest.rs`; services only see these.

pub mod entries;
