use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use crates::domain::{
    entities::{
        chat::{ChatRoomEntity, ChatSettingsEntity, InsertChatMessageEntity, InsertChatRoomEntity},
        users::UserEntity,
    },
    repositories::{
        chat::ChatRepository, files::FileRepository, social::SocialRepository,
        subscriptions::SubscriptionRepository, users::UserRepository,
    },
    value_objects::{
        chat::{ChatEvent, InboundChatPayload, RoomSummary},
        enums::can_chat::CanChat,
        insert_outcome::InsertOutcome,
        pagination::Page,
    },
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{
    RwLock,
    mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Identifies one socket subscribed to a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

struct Subscriber {
    id: SubscriberId,
    sender: UnboundedSender<ChatEvent>,
}

/// In-process registry of live room sockets.
#[derive(Default, Clone)]
pub struct ChatHub {
    rooms: Arc<RwLock<HashMap<Uuid, Vec<Subscriber>>>>,
}

impl ChatHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn join(&self, room_id: Uuid) -> (SubscriberId, UnboundedReceiver<ChatEvent>) {
        let (sender, receiver) = unbounded_channel();
        let id = SubscriberId::new();

        let mut rooms = self.rooms.write().await;
        let subscribers = rooms.entry(room_id).or_default();
        subscribers.push(Subscriber { id, sender });
        debug!(%room_id, sockets = subscribers.len(), "chat: socket joined room");

        (id, receiver)
    }

    pub async fn leave(&self, room_id: Uuid, subscriber_id: SubscriberId) {
        let mut rooms = self.rooms.write().await;
        if let Some(subscribers) = rooms.get_mut(&room_id) {
            subscribers.retain(|subscriber| subscriber.id != subscriber_id);
            if subscribers.is_empty() {
                rooms.remove(&room_id);
            }
        }
        debug!(%room_id, "chat: socket left room");
    }

    /// Sends the event to every live socket in the room and drops dead senders.
    /// Returns the number of sockets reached.
    pub async fn broadcast(&self, room_id: Uuid, event: ChatEvent) -> usize {
        let mut rooms = self.rooms.write().await;
        let Some(subscribers) = rooms.get_mut(&room_id) else {
            return 0;
        };

        let before = subscribers.len();
        subscribers.retain(|subscriber| subscriber.sender.send(event.clone()).is_ok());
        let delivered = subscribers.len();
        if delivered != before {
            debug!(%room_id, dropped = before - delivered, "chat: removed dead sockets");
        }
        if subscribers.is_empty() {
            rooms.remove(&room_id);
        }
        delivered
    }

    pub async fn socket_count(&self, room_id: Uuid) -> usize {
        self.rooms
            .read()
            .await
            .get(&room_id)
            .map_or(0, |subscribers| subscribers.len())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OpenedRoom {
    pub room_id: Uuid,
    pub chat_started: Uuid,
    pub chat_started_username: Option<String>,
    pub writing_to: Uuid,
    pub writing_to_username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatSettingsModel {
    pub can_chat: CanChat,
    #[serde(default)]
    pub subscription_plan_ids: Vec<Uuid>,
    #[serde(default)]
    pub minimum_message_donation: i64,
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("user not found")]
    UserNotFound,
    #[error("chat room not found")]
    RoomNotFound,
    #[error("a chat cannot be created with yourself")]
    SelfChat,
    #[error("you are blocked by this user")]
    Blocked,
    #[error("you are not a participant of this chat")]
    NotParticipant,
    #[error("this creator does not accept messages")]
    ChatDisabled,
    #[error("an active subscription is required to message this creator")]
    SubscriptionRequired,
    #[error("only creators can configure chat settings")]
    NotCreator,
    #[error("minimum message donation must not be negative")]
    InvalidMinimumDonation,
    #[error("message must contain text or a file")]
    EmptyMessage,
    #[error("file not found")]
    FileNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ChatError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ChatError::UserNotFound | ChatError::RoomNotFound | ChatError::FileNotFound => {
                StatusCode::NOT_FOUND
            }
            ChatError::Blocked
            | ChatError::NotParticipant
            | ChatError::ChatDisabled
            | ChatError::SubscriptionRequired
            | ChatError::NotCreator => StatusCode::FORBIDDEN,
            ChatError::SelfChat | ChatError::InvalidMinimumDonation | ChatError::EmptyMessage => {
                StatusCode::BAD_REQUEST
            }
            ChatError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, ChatError>;

pub struct ChatUseCase<C, U, S, Sub, F>
where
    C: ChatRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: SocialRepository + Send + Sync + 'static,
    Sub: SubscriptionRepository + Send + Sync + 'static,
    F: FileRepository + Send + Sync + 'static,
{
    chat_repo: Arc<C>,
    user_repo: Arc<U>,
    social_repo: Arc<S>,
    subscription_repo: Arc<Sub>,
    file_repo: Arc<F>,
    hub: ChatHub,
}

impl<C, U, S, Sub, F> ChatUseCase<C, U, S, Sub, F>
where
    C: ChatRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: SocialRepository + Send + Sync + 'static,
    Sub: SubscriptionRepository + Send + Sync + 'static,
    F: FileRepository + Send + Sync + 'static,
{
    pub fn new(
        chat_repo: Arc<C>,
        user_repo: Arc<U>,
        social_repo: Arc<S>,
        subscription_repo: Arc<Sub>,
        file_repo: Arc<F>,
        hub: ChatHub,
    ) -> Self {
        Self {
            chat_repo,
            user_repo,
            social_repo,
            subscription_repo,
            file_repo,
            hub,
        }
    }

    pub fn hub(&self) -> &ChatHub {
        &self.hub
    }

    async fn visible_user(&self, user_id: Uuid) -> UseCaseResult<UserEntity> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "chat: failed to load user");
                ChatError::Internal(err)
            })?
            .filter(|user| !user.is_deleted && !user.is_blocked_by_admin)
            .ok_or(ChatError::UserNotFound)
    }

    async fn room(&self, room_id: Uuid) -> UseCaseResult<ChatRoomEntity> {
        self.chat_repo
            .find_room(room_id)
            .await
            .map_err(|err| {
                error!(%room_id, db_error = ?err, "chat: failed to load room");
                ChatError::Internal(err)
            })?
            .ok_or(ChatError::RoomNotFound)
    }

    async fn blocked_between(&self, first: Uuid, second: Uuid) -> UseCaseResult<bool> {
        self.social_repo
            .is_blocked_between(first, second)
            .await
            .map_err(|err| {
                error!(%first, %second, db_error = ?err, "chat: failed to check block");
                ChatError::Internal(err)
            })
    }

    /// Socket admission: the room exists, the user takes part in it and
    /// neither side has blocked the other.
    pub async fn verify_chat_access(&self, room_id: Uuid, user_id: Uuid) -> UseCaseResult<bool> {
        let room = match self.room(room_id).await {
            Ok(room) => room,
            Err(ChatError::RoomNotFound) => return Ok(false),
            Err(err) => return Err(err),
        };
        if !room.has_participant(user_id) {
            return Ok(false);
        }
        Ok(!self
            .blocked_between(room.creator_id, room.subscriber_id)
            .await?)
    }

    pub async fn list_rooms(&self, user_id: Uuid) -> UseCaseResult<Vec<RoomSummary>> {
        let rooms = self.chat_repo.list_rooms_for(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "chat: failed to list rooms");
            ChatError::Internal(err)
        })?;

        let mut summaries = Vec::with_capacity(rooms.len());
        for room in rooms {
            let last_message = self
                .chat_repo
                .last_message(room.id)
                .await
                .map_err(ChatError::Internal)?;
            summaries.push(RoomSummary {
                other_user_id: room.other_participant(user_id),
                room,
                last_message,
            });
        }
        // Most recent conversation first.
        summaries.sort_by_key(|summary| {
            std::cmp::Reverse(
                summary
                    .last_message
                    .as_ref()
                    .map_or(summary.room.created_at, |message| message.created_at),
            )
        });
        Ok(summaries)
    }

    /// Rejects new conversations the creator's settings do not allow.
    async fn check_settings(&self, writer_id: Uuid, creator: &UserEntity) -> UseCaseResult<()> {
        if !creator.is_creator {
            return Ok(());
        }
        let settings = self
            .chat_repo
            .find_settings(creator.id)
            .await
            .map_err(ChatError::Internal)?;
        let Some(settings) = settings else {
            return Ok(());
        };

        match CanChat::from_str(&settings.can_chat) {
            CanChat::Everyone | CanChat::Donations => Ok(()),
            CanChat::Nobody => Err(ChatError::ChatDisabled),
            CanChat::Subscribers => {
                let active = self
                    .subscription_repo
                    .active_plan_ids(writer_id, creator.id, Utc::now())
                    .await
                    .map_err(ChatError::Internal)?;
                let allowed = if settings.subscription_plan_ids.is_empty() {
                    !active.is_empty()
                } else {
                    active
                        .iter()
                        .any(|plan_id| settings.subscription_plan_ids.contains(plan_id))
                };
                if allowed {
                    Ok(())
                } else {
                    Err(ChatError::SubscriptionRequired)
                }
            }
        }
    }

    /// Returns the pair's room, creating it with `other_id` as the room's creator side.
    pub async fn open_room(&self, user_id: Uuid, other_id: Uuid) -> UseCaseResult<OpenedRoom> {
        if user_id == other_id {
            return Err(ChatError::SelfChat);
        }
        let writing_to = self.visible_user(other_id).await?;
        if self.blocked_between(user_id, other_id).await? {
            return Err(ChatError::Blocked);
        }
        let chat_started = self.visible_user(user_id).await?;

        let existing = self
            .chat_repo
            .find_room_between(user_id, other_id)
            .await
            .map_err(ChatError::Internal)?;

        let room = match existing {
            Some(room) => room,
            None => {
                self.check_settings(user_id, &writing_to).await?;
                let outcome = self
                    .chat_repo
                    .create_room(InsertChatRoomEntity {
                        creator_id: other_id,
                        subscriber_id: user_id,
                    })
                    .await
                    .map_err(|err| {
                        error!(%user_id, %other_id, db_error = ?err, "chat: failed to create room");
                        ChatError::Internal(err)
                    })?;
                match outcome {
                    InsertOutcome::Inserted(room) => {
                        info!(room_id = %room.id, %user_id, %other_id, "chat: room created");
                        room
                    }
                    // Lost a race with the other participant.
                    InsertOutcome::Duplicate => self
                        .chat_repo
                        .find_room_between(user_id, other_id)
                        .await
                        .map_err(ChatError::Internal)?
                        .ok_or(ChatError::RoomNotFound)?,
                }
            }
        };

        Ok(OpenedRoom {
            room_id: room.id,
            chat_started: chat_started.id,
            chat_started_username: chat_started.username,
            writing_to: writing_to.id,
            writing_to_username: writing_to.username,
        })
    }

    pub async fn list_messages(
        &self,
        user_id: Uuid,
        room_id: Uuid,
        page: Page,
    ) -> UseCaseResult<Vec<ChatEvent>> {
        let room = self.room(room_id).await?;
        if !room.has_participant(user_id) {
            return Err(ChatError::NotParticipant);
        }
        let messages = self
            .chat_repo
            .list_messages(room_id, page)
            .await
            .map_err(|err| {
                error!(%room_id, db_error = ?err, "chat: failed to list messages");
                ChatError::Internal(err)
            })?;
        Ok(messages.into_iter().map(ChatEvent::from).collect())
    }

    pub async fn settings(&self, creator_id: Uuid) -> UseCaseResult<ChatSettingsEntity> {
        let settings = self
            .chat_repo
            .find_settings(creator_id)
            .await
            .map_err(ChatError::Internal)?;
        Ok(settings.unwrap_or_else(|| ChatSettingsEntity {
            creator_id,
            can_chat: CanChat::default().to_string(),
            subscription_plan_ids: Vec::new(),
            minimum_message_donation: 0,
            updated_at: Utc::now(),
        }))
    }

    pub async fn configure(
        &self,
        creator_id: Uuid,
        model: ChatSettingsModel,
    ) -> UseCaseResult<ChatSettingsEntity> {
        let creator = self.visible_user(creator_id).await?;
        if !creator.is_creator {
            return Err(ChatError::NotCreator);
        }
        if model.minimum_message_donation < 0 {
            return Err(ChatError::InvalidMinimumDonation);
        }

        let settings = self
            .chat_repo
            .upsert_settings(ChatSettingsEntity {
                creator_id,
                can_chat: model.can_chat.to_string(),
                subscription_plan_ids: model.subscription_plan_ids,
                minimum_message_donation: model.minimum_message_donation,
                updated_at: Utc::now(),
            })
            .await
            .map_err(|err| {
                error!(%creator_id, db_error = ?err, "chat: failed to save settings");
                ChatError::Internal(err)
            })?;

        info!(%creator_id, can_chat = %settings.can_chat, "chat: settings updated");
        Ok(settings)
    }

    /// Persists an inbound frame and fans it out to the room.
    pub async fn post_message(
        &self,
        room_id: Uuid,
        sender_id: Uuid,
        payload: InboundChatPayload,
    ) -> UseCaseResult<ChatEvent> {
        if payload.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if let Some(file_id) = payload.file_id {
            let owned = self
                .file_repo
                .find_by_id(file_id)
                .await
                .map_err(|err| {
                    error!(%file_id, db_error = ?err, "chat: failed to load attachment");
                    ChatError::Internal(err)
                })?
                .is_some_and(|file| file.owner_id == Some(sender_id));
            if !owned {
                debug!(%room_id, %sender_id, %file_id, "chat: attachment not owned by sender");
                return Err(ChatError::FileNotFound);
            }
        }

        let message = self
            .chat_repo
            .insert_message(InsertChatMessageEntity {
                room_id,
                sender_id,
                content: payload.text(),
                file_id: payload.file_id,
            })
            .await
            .map_err(|err| {
                error!(%room_id, %sender_id, db_error = ?err, "chat: failed to store message");
                ChatError::Internal(err)
            })?;

        let event = ChatEvent::from(message);
        let sockets = self.hub.broadcast(room_id, event.clone()).await;
        debug!(%room_id, message_id = %event.message_id, sockets, "chat: message broadcast");
        Ok(event)
    }

    /// Called when an event reaches a socket; delivery to anyone but the
    /// sender marks the message read.
    pub async fn acknowledge_delivery(&self, event: &ChatEvent, recipient_id: Uuid) -> bool {
        if event.sender_id == recipient_id || event.is_read {
            return false;
        }
        match self.chat_repo.mark_read(event.message_id).await {
            Ok(()) => true,
            Err(err) => {
                warn!(message_id = %event.message_id, db_error = ?err, "chat: failed to mark message read");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_fixtures::{sample_creator, sample_message, sample_room, sample_user};
    use crates::domain::repositories::{
        chat::MockChatRepository, files::MockFileRepository, social::MockSocialRepository,
        subscriptions::MockSubscriptionRepository, users::MockUserRepository,
    };
    use crates::domain::entities::files::FileEntity;
    use mockall::predicate::eq;

    type TestUseCase = ChatUseCase<
        MockChatRepository,
        MockUserRepository,
        MockSocialRepository,
        MockSubscriptionRepository,
        MockFileRepository,
    >;

    fn build(
        chat: MockChatRepository,
        users: MockUserRepository,
        social: MockSocialRepository,
        subscriptions: MockSubscriptionRepository,
    ) -> TestUseCase {
        build_with_files(chat, users, social, subscriptions, MockFileRepository::new())
    }

    fn build_with_files(
        chat: MockChatRepository,
        users: MockUserRepository,
        social: MockSocialRepository,
        subscriptions: MockSubscriptionRepository,
        files: MockFileRepository,
    ) -> TestUseCase {
        ChatUseCase::new(
            Arc::new(chat),
            Arc::new(users),
            Arc::new(social),
            Arc::new(subscriptions),
            Arc::new(files),
            ChatHub::new(),
        )
    }

    fn settings(creator_id: Uuid, can_chat: CanChat, plans: Vec<Uuid>) -> ChatSettingsEntity {
        ChatSettingsEntity {
            creator_id,
            can_chat: can_chat.to_string(),
            subscription_plan_ids: plans,
            minimum_message_donation: 0,
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn hub_fans_out_and_drops_dead_sockets() {
        let hub = ChatHub::new();
        let room_id = Uuid::new_v4();
        let (_, mut first) = hub.join(room_id).await;
        let (_, second) = hub.join(room_id).await;
        drop(second);

        let event = ChatEvent::from(sample_message(room_id, Uuid::new_v4(), "hi"));
        let delivered = hub.broadcast(room_id, event.clone()).await;

        assert_eq!(delivered, 1);
        assert_eq!(first.recv().await, Some(event));
        assert_eq!(hub.socket_count(room_id).await, 1);
    }

    #[tokio::test]
    async fn leaving_removes_empty_room() {
        let hub = ChatHub::new();
        let room_id = Uuid::new_v4();
        let (id, _receiver) = hub.join(room_id).await;

        hub.leave(room_id, id).await;

        assert_eq!(hub.socket_count(room_id).await, 0);
    }

    #[tokio::test]
    async fn blocked_pair_has_no_access() {
        let (room_id, creator_id, subscriber_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut chat = MockChatRepository::new();
        chat.expect_find_room()
            .with(eq(room_id))
            .returning(move |id| Ok(Some(sample_room(id, creator_id, subscriber_id))));
        let mut social = MockSocialRepository::new();
        social
            .expect_is_blocked_between()
            .returning(|_, _| Ok(true));

        let usecase = build(
            chat,
            MockUserRepository::new(),
            social,
            MockSubscriptionRepository::new(),
        );

        assert!(!usecase.verify_chat_access(room_id, subscriber_id).await.unwrap());
    }

    #[tokio::test]
    async fn outsider_and_missing_room_have_no_access() {
        let (room_id, creator_id, subscriber_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut chat = MockChatRepository::new();
        chat.expect_find_room()
            .with(eq(room_id))
            .returning(move |id| Ok(Some(sample_room(id, creator_id, subscriber_id))));
        chat.expect_find_room().returning(|_| Ok(None));
        let mut social = MockSocialRepository::new();
        social
            .expect_is_blocked_between()
            .returning(|_, _| Ok(false));

        let usecase = build(
            chat,
            MockUserRepository::new(),
            social,
            MockSubscriptionRepository::new(),
        );

        assert!(usecase.verify_chat_access(room_id, creator_id).await.unwrap());
        assert!(!usecase.verify_chat_access(room_id, Uuid::new_v4()).await.unwrap());
        assert!(!usecase
            .verify_chat_access(Uuid::new_v4(), creator_id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn cannot_open_room_with_self() {
        let user_id = Uuid::new_v4();
        let usecase = build(
            MockChatRepository::new(),
            MockUserRepository::new(),
            MockSocialRepository::new(),
            MockSubscriptionRepository::new(),
        );

        let err = usecase.open_room(user_id, user_id).await.unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn blocked_user_cannot_open_room() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id))));
        let mut social = MockSocialRepository::new();
        social
            .expect_is_blocked_between()
            .returning(|_, _| Ok(true));
        let mut chat = MockChatRepository::new();
        chat.expect_create_room().never();

        let err = build(chat, users, social, MockSubscriptionRepository::new())
            .open_room(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn new_room_puts_recipient_on_creator_side() {
        let (user_id, creator_id) = (Uuid::new_v4(), Uuid::new_v4());
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(creator_id))
            .returning(|id| Ok(Some(sample_creator(id, 10))));
        users
            .expect_find_by_id()
            .with(eq(user_id))
            .returning(|id| Ok(Some(sample_user(id))));
        let mut social = MockSocialRepository::new();
        social
            .expect_is_blocked_between()
            .returning(|_, _| Ok(false));
        let mut chat = MockChatRepository::new();
        chat.expect_find_room_between().returning(|_, _| Ok(None));
        chat.expect_find_settings().returning(|_| Ok(None));
        chat.expect_create_room()
            .withf(move |insert| insert.creator_id == creator_id && insert.subscriber_id == user_id)
            .times(1)
            .returning(|insert| {
                Ok(InsertOutcome::Inserted(sample_room(
                    Uuid::new_v4(),
                    insert.creator_id,
                    insert.subscriber_id,
                )))
            });

        let opened = build(chat, users, social, MockSubscriptionRepository::new())
            .open_room(user_id, creator_id)
            .await
            .unwrap();

        assert_eq!(opened.chat_started, user_id);
        assert_eq!(opened.writing_to, creator_id);
    }

    #[tokio::test]
    async fn subscribers_only_creator_needs_matching_plan() {
        let (user_id, creator_id, plan_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(creator_id))
            .returning(|id| Ok(Some(sample_creator(id, 10))));
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id))));
        let mut social = MockSocialRepository::new();
        social
            .expect_is_blocked_between()
            .returning(|_, _| Ok(false));
        let mut chat = MockChatRepository::new();
        chat.expect_find_room_between().returning(|_, _| Ok(None));
        chat.expect_find_settings()
            .returning(move |id| Ok(Some(settings(id, CanChat::Subscribers, vec![plan_id]))));
        chat.expect_create_room().never();
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_active_plan_ids()
            .returning(|_, _, _| Ok(vec![Uuid::new_v4()]));

        let err = build(chat, users, social, subscriptions)
            .open_room(user_id, creator_id)
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::SubscriptionRequired));
    }

    #[tokio::test]
    async fn posted_message_reaches_room_sockets() {
        let (room_id, sender_id) = (Uuid::new_v4(), Uuid::new_v4());
        let mut chat = MockChatRepository::new();
        chat.expect_insert_message()
            .withf(|insert| insert.content.as_deref() == Some("hello"))
            .returning(|insert| {
                Ok(sample_message(
                    insert.room_id,
                    insert.sender_id,
                    insert.content.as_deref().unwrap_or_default(),
                ))
            });
        let usecase = build(
            chat,
            MockUserRepository::new(),
            MockSocialRepository::new(),
            MockSubscriptionRepository::new(),
        );
        let (_, mut socket) = usecase.hub().join(room_id).await;

        let event = usecase
            .post_message(
                room_id,
                sender_id,
                InboundChatPayload {
                    message: Some(" hello ".to_string()),
                    file_id: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(socket.recv().await, Some(event));
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let usecase = build(
            MockChatRepository::new(),
            MockUserRepository::new(),
            MockSocialRepository::new(),
            MockSubscriptionRepository::new(),
        );

        let err = usecase
            .post_message(
                Uuid::new_v4(),
                Uuid::new_v4(),
                InboundChatPayload {
                    message: Some("   ".to_string()),
                    file_id: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::EmptyMessage));
    }

    #[tokio::test]
    async fn attachment_must_belong_to_sender() {
        let (room_id, sender_id, file_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut files = MockFileRepository::new();
        files.expect_find_by_id().with(eq(file_id)).returning(|id| {
            Ok(Some(FileEntity {
                id,
                owner_id: Some(Uuid::new_v4()),
                name: "photo.jpg".to_string(),
                size: 1024,
                content_type: Some("image/jpeg".to_string()),
                storage_key: "files/photo.jpg".to_string(),
                created_at: Utc::now(),
            }))
        });
        let usecase = build_with_files(
            MockChatRepository::new(),
            MockUserRepository::new(),
            MockSocialRepository::new(),
            MockSubscriptionRepository::new(),
            files,
        );

        let err = usecase
            .post_message(
                room_id,
                sender_id,
                InboundChatPayload {
                    message: None,
                    file_id: Some(file_id),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::FileNotFound));
    }

    #[tokio::test]
    async fn delivery_to_recipient_marks_read() {
        let (room_id, sender_id, recipient_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let event = ChatEvent::from(sample_message(room_id, sender_id, "hi"));
        let message_id = event.message_id;
        let mut chat = MockChatRepository::new();
        chat.expect_mark_read()
            .with(eq(message_id))
            .times(1)
            .returning(|_| Ok(()));
        let usecase = build(
            chat,
            MockUserRepository::new(),
            MockSocialRepository::new(),
            MockSubscriptionRepository::new(),
        );

        assert!(!usecase.acknowledge_delivery(&event, sender_id).await);
        assert!(usecase.acknowledge_delivery(&event, recipient_id).await);
    }
}
