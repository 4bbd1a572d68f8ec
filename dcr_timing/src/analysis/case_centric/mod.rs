//! Case-centric analyses on [`EventTable`](crate::EventTable)s

pub mod timing;
