//! Aggregation pipelines for the joined list views.
//!
//! Every pipeline has the same shape: filter, join, flatten single-valued
//! joins, sort, then skip and limit. Pagination stages are appended only when
//! [`Pagination`] asks for them, and `$skip` always precedes `$limit`.

use bson::oid::ObjectId;
use bson::{doc, Document};

use crate::shared::pagination::Pagination;

use super::{MESSAGES, USERS};

/// Fields of a user document that never leave the server through a join.
fn hidden_user_fields(prefix: &str) -> Document {
    let mut projection = Document::new();
    for field in ["hash", "contacts", "chats"] {
        projection.insert(format!("{}{}", prefix, field), 0);
    }
    projection
}

fn paginate(pipeline: &mut Vec<Document>, pagination: Pagination) {
    if let Some(skip) = pagination.skip() {
        let skip = skip as i64;
        pipeline.push(doc! { "$skip": skip });
    }
    if let Some(limit) = pagination.limit() {
        let limit = limit as i64;
        pipeline.push(doc! { "$limit": limit });
    }
}

/// Runs on `users`: the owner's contacts as public views, sorted by name.
pub fn contacts(owner_id: ObjectId, pagination: Pagination) -> Vec<Document> {
    let mut pipeline = vec![
        doc! { "$match": { "_id": owner_id } },
        doc! { "$lookup": {
            "from": USERS,
            "localField": "contacts",
            "foreignField": "_id",
            "as": "contacts",
        } },
        doc! { "$unwind": "$contacts" },
        doc! { "$replaceRoot": { "newRoot": "$contacts" } },
        doc! { "$project": hidden_user_fields("") },
        doc! { "$sort": { "name": 1, "_id": 1 } },
    ];
    paginate(&mut pipeline, pagination);
    pipeline
}

/// Runs on `chats`: the member's chats with both members and `lastMessage`
/// joined, most recently updated first. Chats without a last message are kept.
pub fn chats(member_id: ObjectId, pagination: Pagination) -> Vec<Document> {
    let mut pipeline = vec![
        doc! { "$match": { "users": member_id } },
        doc! { "$lookup": {
            "from": USERS,
            "localField": "users",
            "foreignField": "_id",
            "as": "users",
        } },
        doc! { "$project": hidden_user_fields("users.") },
        doc! { "$lookup": {
            "from": MESSAGES,
            "localField": "lastMessage",
            "foreignField": "_id",
            "as": "lastMessage",
        } },
        doc! { "$unwind": {
            "path": "$lastMessage",
            "preserveNullAndEmptyArrays": true,
        } },
        doc! { "$sort": { "updatedAt": -1, "_id": -1 } },
    ];
    paginate(&mut pipeline, pagination);
    pipeline
}

/// Runs on `messages`: the chat's messages with the sender joined, newest first.
pub fn messages(chat_id: ObjectId, pagination: Pagination) -> Vec<Document> {
    let mut pipeline = vec![
        doc! { "$match": { "chat": chat_id } },
        doc! { "$lookup": {
            "from": USERS,
            "localField": "user",
            "foreignField": "_id",
            "as": "user",
        } },
        doc! { "$unwind": {
            "path": "$user",
            "preserveNullAndEmptyArrays": true,
        } },
        doc! { "$project": hidden_user_fields("user.") },
        doc! { "$sort": { "createdAt": -1, "_id": -1 } },
    ];
    paginate(&mut pipeline, pagination);
    pipeline
}
