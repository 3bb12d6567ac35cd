//! Incoming WhatsApp message handling: filtering, unwrapping, and conversion.

use tracing::{debug, warn};
use uuid::Uuid;
use wabot_core::message::IncomingMessage;

/// Chat JID WhatsApp uses for status updates.
pub(super) const STATUS_BROADCAST: &str = "status@broadcast";

/// Whether a chat JID is the status broadcast pseudo-chat.
pub fn is_status_broadcast(chat_jid: &str) -> bool {
    chat_jid == STATUS_BROADCAST
}

/// Whether `phone` may talk to the bot. Empty allow-list admits everyone.
pub(super) fn is_allowed(phone: &str, allowed: &[String]) -> bool {
    allowed.is_empty() || allowed.iter().any(|a| a == phone)
}

/// Strip device-sent, ephemeral, and view-once wrappers.
fn unwrap_message(msg: &waproto::whatsapp::Message) -> &waproto::whatsapp::Message {
    msg.device_sent_message
        .as_ref()
        .and_then(|d| d.message.as_deref())
        .or_else(|| {
            msg.ephemeral_message
                .as_ref()
                .and_then(|e| e.message.as_deref())
        })
        .or_else(|| {
            msg.view_once_message
                .as_ref()
                .and_then(|v| v.message.as_deref())
        })
        .unwrap_or(msg)
}

/// Text of a message: plain or extended text, else the caption of an image,
/// video, or document. `None` when there is no non-empty text.
pub(super) fn extract_text(msg: &waproto::whatsapp::Message) -> Option<String> {
    let inner = unwrap_message(msg);

    inner
        .conversation
        .as_deref()
        .or_else(|| {
            inner
                .extended_text_message
                .as_ref()
                .and_then(|e| e.text.as_deref())
        })
        .or_else(|| inner.image_message.as_ref().and_then(|m| m.caption.as_deref()))
        .or_else(|| inner.video_message.as_ref().and_then(|m| m.caption.as_deref()))
        .or_else(|| {
            inner
                .document_message
                .as_ref()
                .and_then(|m| m.caption.as_deref())
        })
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Protocol traffic that is not something a person sent: revokes and edits,
/// reactions, poll votes, sender-key distribution.
fn is_control(msg: &waproto::whatsapp::Message) -> bool {
    msg.protocol_message.is_some()
        || msg.reaction_message.is_some()
        || msg.poll_update_message.is_some()
        || msg.sender_key_distribution_message.is_some()
}

/// Body to hand to the responder. Stickers, voice notes, and uncaptioned
/// media get an empty body; control messages get `None`.
pub(super) fn message_body(msg: &waproto::whatsapp::Message) -> Option<String> {
    if let Some(text) = extract_text(msg) {
        return Some(text);
    }
    if is_control(unwrap_message(msg)) {
        return None;
    }
    Some(String::new())
}

/// Convert a raw WhatsApp message into an [`IncomingMessage`].
///
/// Returns `None` for our own messages, unauthorized senders, and control
/// messages. Messages without text are passed on with an empty body. Status broadcasts are passed through flagged with
/// `is_broadcast`; dropping them is the gateway's job.
pub(super) fn to_incoming(
    msg: &waproto::whatsapp::Message,
    info: &wacore::types::message::MessageInfo,
    allowed: &[String],
) -> Option<IncomingMessage> {
    if info.source.is_from_me {
        return None;
    }

    let phone = info.source.sender.user.clone();
    if !is_allowed(&phone, allowed) {
        warn!("ignoring whatsapp message from unauthorized {phone}");
        return None;
    }

    let Some(text) = message_body(msg) else {
        debug!("WA filtered: control message {}", info.id);
        return None;
    };

    let chat_jid = info.source.chat.to_string();
    let sender_name = if info.push_name.is_empty() {
        phone
    } else {
        info.push_name.clone()
    };

    Some(IncomingMessage {
        id: Uuid::new_v4(),
        channel: "whatsapp".to_string(),
        sender_id: info.source.sender.to_string(),
        sender_name: Some(sender_name),
        text,
        timestamp: chrono::Utc::now(),
        is_broadcast: is_status_broadcast(&chat_jid),
        reply_target: Some(chat_jid),
        is_group: info.source.is_group,
    })
}
