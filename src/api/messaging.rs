// ABOUTME: Coach-client messaging endpoints for conversations, history, and sending
// ABOUTME: Attachment upload is the crate's multipart request path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forma Labs

//! Messaging endpoints
//!
//! Message persistence and fan-out live server-side. Attachment sends go out
//! as multipart form payloads, so the transport picks the boundary and the
//! client sets no explicit content type.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::errors::ApiResult;
use crate::models::{MultipartField, RequestBody, RequestDescriptor, RequestOptions};

/// A coach-client conversation
#[derive(Debug, Clone, Deserialize)]
pub struct Conversation {
    /// Conversation identifier
    pub id: Uuid,
    /// Display name of the other participant
    pub participant_name: String,
    /// Most recent message preview, if any
    pub last_message: Option<String>,
    /// Unread message count for the current user
    pub unread_count: u32,
    /// When the conversation last changed
    pub updated_at: DateTime<Utc>,
}

/// One message within a conversation
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Message identifier
    pub id: Uuid,
    /// Conversation this message belongs to
    pub conversation_id: Uuid,
    /// Sending user
    pub sender_id: Uuid,
    /// Message text
    pub body: String,
    /// Download URL of an attached file, if any
    pub attachment_url: Option<String>,
    /// When the message was sent
    pub sent_at: DateTime<Utc>,
}

/// Text message send request
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    /// Message text
    pub body: String,
}

/// Messaging endpoint wrapper
#[derive(Clone)]
pub struct MessagingApi {
    client: Arc<ApiClient>,
}

impl MessagingApi {
    /// Bind the messaging endpoints to a session client
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// List the user's conversations, most recently active first
    ///
    /// # Errors
    /// Returns an error if the request fails
    pub async fn conversations(&self) -> ApiResult<Vec<Conversation>> {
        let descriptor = RequestDescriptor::get("messaging/conversations");
        let response = self.client.execute(&descriptor, None, None).await?;
        Ok(response.data)
    }

    /// Fetch message history for a conversation
    ///
    /// `before` pages backwards from the given timestamp.
    ///
    /// # Errors
    /// Returns an error if the request fails
    pub async fn history(
        &self,
        conversation_id: Uuid,
        before: Option<DateTime<Utc>>,
        limit: u32,
    ) -> ApiResult<Vec<Message>> {
        let descriptor =
            RequestDescriptor::get(format!("messaging/conversations/{conversation_id}/messages"));
        let mut query = vec![("limit".to_owned(), limit.to_string())];
        if let Some(cursor) = before {
            query.push(("before".to_owned(), cursor.to_rfc3339()));
        }
        let response = self
            .client
            .execute(&descriptor, None, Some(RequestOptions { query }))
            .await?;
        Ok(response.data)
    }

    /// Send a text message
    ///
    /// # Errors
    /// Returns an error if the send is rejected or the request fails
    pub async fn send_text(&self, conversation_id: Uuid, body: &str) -> ApiResult<Message> {
        let descriptor =
            RequestDescriptor::post(format!("messaging/conversations/{conversation_id}/messages"));
        let request = SendMessageRequest {
            body: body.to_owned(),
        };
        let response = self
            .client
            .execute(&descriptor, Some(RequestBody::json(&request)?), None)
            .await?;
        Ok(response.data)
    }

    /// Send a message with a file attachment
    ///
    /// Goes out as a multipart form with a `caption` text field and a `file`
    /// part carrying the bytes.
    ///
    /// # Errors
    /// Returns an error if the upload is rejected or the request fails
    pub async fn send_attachment(
        &self,
        conversation_id: Uuid,
        caption: &str,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> ApiResult<Message> {
        let descriptor = RequestDescriptor::post(format!(
            "messaging/conversations/{conversation_id}/attachments"
        ));
        let body = RequestBody::Multipart(vec![
            MultipartField::Text {
                name: "caption".to_owned(),
                value: caption.to_owned(),
            },
            MultipartField::File {
                name: "file".to_owned(),
                filename: filename.to_owned(),
                content_type: content_type.to_owned(),
                data,
            },
        ]);
        let response = self.client.execute(&descriptor, Some(body), None).await?;
        Ok(response.data)
    }
}
