//! DNS message construction and serialization on top of `hickory-proto`.

use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use warden_dns_domain::DomainError;

/// Serialize a message to wire format.
pub fn encode(message: &Message) -> Result<Vec<u8>, DomainError> {
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    message
        .emit(&mut encoder)
        .map_err(|e| DomainError::InvalidDnsMessage(format!("serialization failed: {e}")))?;
    Ok(buf)
}

/// Parse a wire-format message.
pub fn decode(bytes: &[u8]) -> Result<Message, DomainError> {
    Message::from_vec(bytes)
        .map_err(|e| DomainError::InvalidDnsMessage(format!("decode failed: {e}")))
}

/// Build a recursive query for one question, returning the message id for
/// response matching together with the wire bytes.
pub fn build_upstream_query(question: &Query) -> Result<(u16, Vec<u8>), DomainError> {
    let id = fastrand::u16(..);
    let mut message = Message::new(id, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(question.clone());
    Ok((id, encode(&message)?))
}

/// Start a response for `request`: id and question section echoed, RD
/// preserved, RA set, AA clear. The caller fills in answers and the
/// response code.
pub fn response_skeleton(request: &Message) -> Message {
    let mut response = Message::new(request.id(), MessageType::Response, OpCode::Query);
    response.set_recursion_desired(request.recursion_desired());
    response.set_recursion_available(true);
    response.set_authoritative(false);
    for question in request.queries() {
        response.add_query(question.clone());
    }
    response
}
