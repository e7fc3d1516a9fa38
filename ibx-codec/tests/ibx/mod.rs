//! IBX1 binary format tests
//!
//! Decoding reference files and binary round trips.

mod decode;
mod round_trip;
