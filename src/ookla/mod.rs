//! Everything that speaks the result service's protocol: the payload
//! shape, the signature it must carry, and the HTTP exchange that
//! redeems it for a result id.

pub(crate) mod client;
pub(crate) mod payload;
pub(crate) mod requests;
pub(crate) mod signature;
