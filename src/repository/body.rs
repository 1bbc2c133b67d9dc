//! Response body aggregation.

use std::pin::pin;

use bytes::{BufMut, Bytes, BytesMut};
use http_body_util::BodyExt;
use hyper::body::Body;

/// Concatenate every data frame of `body`, in arrival order.
///
/// Trailer frames are ignored. A failing frame fails the whole body; partial
/// data is never returned.
pub async fn aggregate_body<B: Body>(body: B) -> Result<Bytes, B::Error> {
    let mut body = pin!(body);
    let mut buffer = BytesMut::new();
    while let Some(frame) = body.frame().await {
        if let Ok(data) = frame?.into_data() {
            buffer.put(data);
        }
    }
    Ok(buffer.freeze())
}
