// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event dispatch and the three conversation flows.
//!
//! Every inbound event arrives already parsed into the closed
//! [`EventKind`] set; the engine dispatches by exhaustive matching,
//! consults the per-user [`SessionStore`], and answers through the
//! injected [`ChatGateway`].
//!
//! Error policy: validation failures re-prompt and leave the session
//! unchanged; not-found lookups and storage failures answer the user and
//! abort the flow to idle; gateway failures propagate to the run loop.

use std::sync::Arc;

use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use dripbot_core::{
    ChatGateway, DripbotError, EventKind, InboundEvent, Keyboard, MenuAction, NewStatusRange,
    OrderDate, OrderId, OrderStore, Reply, Selection, StatusCode, UserId, DATE_FORMAT_HINT,
    INFO_MAX_CHARS,
};

use crate::registrar;
use crate::resolver;
use crate::session::{DateIntent, FlowState, SessionStore};

const DATE_PROMPT: &str = "📝 Enter the order date\n\nFormat: DD.MM.YYYY\nExample: 25.11.2025";
const DATE_INVALID: &str = "❌ Wrong format!\n\nFormat: DD.MM.YYYY\nExample: 25.11.2025";
const GENERIC_FAILURE: &str = "❌ Something went wrong! Try again later";
const ADMIN_ONLY: &str = "❌ Admins only";
const USE_BUTTONS: &str = "Use the buttons above to continue";
const IDLE_HINT: &str = "Press /start to begin";

/// Coordinates flows, sessions, and the admin gate for one bot process.
pub struct FlowEngine {
    store: Arc<dyn OrderStore>,
    sessions: SessionStore,
    admin: Option<UserId>,
}

impl FlowEngine {
    /// Creates an engine over the given store and session store.
    ///
    /// `admin` is the single configured administrator identity; `None`
    /// rejects every admin operation.
    pub fn new(store: Arc<dyn OrderStore>, sessions: SessionStore, admin: Option<UserId>) -> Self {
        Self {
            store,
            sessions,
            admin,
        }
    }

    /// The injected session store, exposed for inspection in tests.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handles one inbound event to completion.
    pub async fn handle_event(
        &self,
        gateway: &dyn ChatGateway,
        event: InboundEvent,
    ) -> Result<(), DripbotError> {
        debug!(user_id = event.user_id.0, kind = ?event.kind, "handling event");
        match event.kind.clone() {
            EventKind::Start => self.on_start(gateway, &event).await,
            EventKind::AdminPanel => self.on_admin_panel(gateway, &event).await,
            EventKind::DeleteRange(id) => self.on_delete_range(gateway, &event, id).await,
            EventKind::Menu(action) => self.on_menu(gateway, &event, action).await,
            EventKind::Select(selection) => self.on_select(gateway, &event, selection).await,
            EventKind::Text(text) => self.on_text(gateway, &event, &text).await,
        }
    }

    fn is_admin(&self, user_id: UserId) -> bool {
        self.admin.is_some_and(|admin| admin == user_id)
    }

    /// Sends the rejection reply unless the sender is the admin. The
    /// rejection names no identity and changes no state.
    async fn ensure_admin(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
    ) -> Result<bool, DripbotError> {
        if self.is_admin(event.user_id) {
            return Ok(true);
        }
        debug!(user_id = event.user_id.0, "admin operation rejected");
        gateway
            .send(Reply::text(event.chat_id, ADMIN_ONLY))
            .await?;
        Ok(false)
    }

    /// Replies by editing the originating message for callback events,
    /// sending a fresh message otherwise.
    async fn respond(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
        reply: Reply,
    ) -> Result<(), DripbotError> {
        if let Some(ref message_id) = event.message_id {
            gateway.edit(event.chat_id, message_id, reply).await
        } else {
            gateway.send(reply).await.map(|_| ())
        }
    }

    /// Aborts the current flow after a storage failure: clears the
    /// session and answers with a generic failure message.
    async fn abort_flow(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
        err: DripbotError,
    ) -> Result<(), DripbotError> {
        warn!(user_id = event.user_id.0, error = %err, "flow aborted on storage failure");
        self.sessions.clear(event.user_id).await;
        self.respond(gateway, event, Reply::text(event.chat_id, GENERIC_FAILURE))
            .await
    }

    // --- Customer handlers ---

    async fn on_start(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
    ) -> Result<(), DripbotError> {
        self.sessions.clear(event.user_id).await;

        let existing = match self.store.order_by_user(event.user_id).await {
            Ok(existing) => existing,
            Err(err) => return self.abort_flow(gateway, event, err).await,
        };

        let reply = match existing {
            Some(order) => {
                let paid = if order.is_paid {
                    "✅ Paid"
                } else {
                    "❌ Not paid"
                };
                Reply::with_keyboard(
                    event.chat_id,
                    format!(
                        "👋 Welcome back!\n\n🔖 Order: {}\n📅 Date: {}\n💳 {paid}",
                        order.order_id, order.order_date
                    ),
                    client_keyboard(),
                )
            }
            None => Reply::with_keyboard(
                event.chat_id,
                "👋 Welcome!\n\nWhat would you like to do?",
                start_keyboard(),
            ),
        };
        gateway.send(reply).await?;
        Ok(())
    }

    async fn on_menu(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
        action: MenuAction,
    ) -> Result<(), DripbotError> {
        match action {
            MenuAction::CheckStatus => self.on_check_status(gateway, event).await,
            MenuAction::ChangeDate => {
                self.sessions.clear(event.user_id).await;
                self.sessions
                    .set(
                        event.user_id,
                        FlowState::AwaitingOrderDate {
                            intent: DateIntent::Register,
                        },
                    )
                    .await;
                gateway.send(Reply::text(event.chat_id, DATE_PROMPT)).await?;
                Ok(())
            }
            MenuAction::SetStatuses => self.on_set_statuses(gateway, event).await,
            MenuAction::ViewRanges => self.on_view_ranges(gateway, event).await,
            MenuAction::ManagePayment => self.on_manage_payment(gateway, event).await,
            MenuAction::ExitAdmin => {
                self.sessions.clear(event.user_id).await;
                gateway
                    .send(Reply::with_keyboard(
                        event.chat_id,
                        "👋 Left the admin panel",
                        client_keyboard(),
                    ))
                    .await?;
                Ok(())
            }
        }
    }

    async fn on_check_status(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
    ) -> Result<(), DripbotError> {
        let order = match self.store.order_by_user(event.user_id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                gateway
                    .send(Reply::with_keyboard(
                        event.chat_id,
                        "❌ No order found!\n\nPress /start",
                        client_keyboard(),
                    ))
                    .await?;
                return Ok(());
            }
            Err(err) => return self.abort_flow(gateway, event, err).await,
        };

        if !order.is_paid {
            gateway
                .send(Reply::with_keyboard(
                    event.chat_id,
                    format!(
                        "❌ ORDER NOT PAID\n\n🔖 Order: {}\n📅 Date: {}\n\n\
                         Please pay for your order to start status tracking 💳",
                        order.order_id, order.order_date
                    ),
                    client_keyboard(),
                ))
                .await?;
            return Ok(());
        }

        let resolved = match resolver::resolve(self.store.as_ref(), order.order_date).await {
            Ok(resolved) => resolved,
            Err(err) => return self.abort_flow(gateway, event, err).await,
        };

        let body = match resolved {
            Some((status, info)) => format!(
                "✅ YOUR ORDER STATUS\n\n🔖 Order: {}\n📅 Date: {}\n📊 Status: {}\n📝 {info}",
                order.order_id,
                order.order_date,
                status.label()
            ),
            None => format!(
                "⏳ Order {} from {}\n\n❌ No status set yet\n\nCheck back later 👍",
                order.order_id, order.order_date
            ),
        };
        gateway
            .send(Reply::with_keyboard(event.chat_id, body, client_keyboard()))
            .await?;
        Ok(())
    }

    /// Entry points for the registration/recheck flow. The two
    /// selections land in the same state but carry different intents:
    /// a quick check never writes anything.
    async fn on_select(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
        selection: Selection,
    ) -> Result<(), DripbotError> {
        match selection {
            Selection::RegisterOrder => {
                self.sessions.clear(event.user_id).await;
                self.sessions
                    .set(
                        event.user_id,
                        FlowState::AwaitingOrderDate {
                            intent: DateIntent::Register,
                        },
                    )
                    .await;
                self.respond(gateway, event, Reply::text(event.chat_id, DATE_PROMPT))
                    .await
            }
            Selection::QuickCheck => {
                self.sessions.clear(event.user_id).await;
                self.sessions
                    .set(
                        event.user_id,
                        FlowState::AwaitingOrderDate {
                            intent: DateIntent::Check,
                        },
                    )
                    .await;
                self.respond(
                    gateway,
                    event,
                    Reply::text(
                        event.chat_id,
                        format!("🔍 Enter an order date to check:\n\nFormat: {DATE_FORMAT_HINT}"),
                    ),
                )
                .await
            }
            Selection::Status(status) => self.on_status_chosen(gateway, event, status).await,
            Selection::Paid(is_paid) => self.on_payment_chosen(gateway, event, is_paid).await,
        }
    }

    async fn on_text(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
        text: &str,
    ) -> Result<(), DripbotError> {
        let state = self.sessions.get(event.user_id).await;
        match state {
            Some(FlowState::AwaitingOrderDate { intent }) => {
                self.on_order_date(gateway, event, intent, text).await
            }
            Some(FlowState::AwaitingDateFrom) => self.on_date_from(gateway, event, text).await,
            Some(FlowState::AwaitingDateTo { date_from }) => {
                self.on_date_to(gateway, event, date_from, text).await
            }
            Some(FlowState::AwaitingInfoText {
                date_from,
                date_to,
                status,
            }) => {
                self.on_info_text(gateway, event, date_from, date_to, status, text)
                    .await
            }
            Some(FlowState::AwaitingOrderIdLookup) => {
                self.on_order_id_lookup(gateway, event, text).await
            }
            Some(FlowState::AwaitingStatusChoice { .. })
            | Some(FlowState::AwaitingPaymentChoice { .. }) => {
                gateway.send(Reply::text(event.chat_id, USE_BUTTONS)).await?;
                Ok(())
            }
            None => {
                gateway.send(Reply::text(event.chat_id, IDLE_HINT)).await?;
                Ok(())
            }
        }
    }

    async fn on_order_date(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
        intent: DateIntent,
        text: &str,
    ) -> Result<(), DripbotError> {
        let Ok(order_date) = OrderDate::parse(text.trim()) else {
            // Re-prompt, state unchanged.
            gateway.send(Reply::text(event.chat_id, DATE_INVALID)).await?;
            return Ok(());
        };

        match intent {
            DateIntent::Register => {
                let order_id =
                    match registrar::register(self.store.as_ref(), event.user_id, order_date).await
                    {
                        Ok(order_id) => order_id,
                        Err(err) => return self.abort_flow(gateway, event, err).await,
                    };
                self.sessions.clear(event.user_id).await;
                gateway
                    .send(Reply::with_keyboard(
                        event.chat_id,
                        format!("✅ Done!\n\n🔖 Order: {order_id}\n📅 Date: {order_date}"),
                        client_keyboard(),
                    ))
                    .await?;
            }
            DateIntent::Check => {
                let resolved = match resolver::resolve(self.store.as_ref(), order_date).await {
                    Ok(resolved) => resolved,
                    Err(err) => return self.abort_flow(gateway, event, err).await,
                };
                self.sessions.clear(event.user_id).await;
                let body = match resolved {
                    Some((status, info)) => format!(
                        "📅 {order_date}\n📊 Status: {}\n📝 {info}",
                        status.label()
                    ),
                    None => format!("📅 {order_date}\n\n❌ No status set for this date yet"),
                };
                gateway
                    .send(Reply::with_keyboard(event.chat_id, body, client_keyboard()))
                    .await?;
            }
        }
        Ok(())
    }

    // --- Admin handlers ---

    async fn on_admin_panel(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
    ) -> Result<(), DripbotError> {
        if !self.ensure_admin(gateway, event).await? {
            return Ok(());
        }
        self.sessions.clear(event.user_id).await;
        gateway
            .send(Reply::with_keyboard(
                event.chat_id,
                "⚙️ ADMIN PANEL",
                admin_keyboard(),
            ))
            .await?;
        Ok(())
    }

    async fn on_set_statuses(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
    ) -> Result<(), DripbotError> {
        if !self.ensure_admin(gateway, event).await? {
            return Ok(());
        }
        self.sessions.clear(event.user_id).await;
        self.sessions
            .set(event.user_id, FlowState::AwaitingDateFrom)
            .await;
        gateway
            .send(Reply::text(
                event.chat_id,
                format!("📝 Enter the start date:\n\nFormat: {DATE_FORMAT_HINT}\nExample: 01.11.2025"),
            ))
            .await?;
        Ok(())
    }

    async fn on_date_from(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
        text: &str,
    ) -> Result<(), DripbotError> {
        let Ok(date_from) = OrderDate::parse(text.trim()) else {
            gateway.send(Reply::text(event.chat_id, DATE_INVALID)).await?;
            return Ok(());
        };
        self.sessions
            .set(event.user_id, FlowState::AwaitingDateTo { date_from })
            .await;
        gateway
            .send(Reply::text(
                event.chat_id,
                format!("📝 Enter the end date:\n\nFormat: {DATE_FORMAT_HINT}\nExample: 10.11.2025"),
            ))
            .await?;
        Ok(())
    }

    async fn on_date_to(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
        date_from: OrderDate,
        text: &str,
    ) -> Result<(), DripbotError> {
        let Ok(date_to) = OrderDate::parse(text.trim()) else {
            gateway.send(Reply::text(event.chat_id, DATE_INVALID)).await?;
            return Ok(());
        };
        self.sessions
            .set(
                event.user_id,
                FlowState::AwaitingStatusChoice { date_from, date_to },
            )
            .await;
        gateway
            .send(Reply::with_keyboard(
                event.chat_id,
                "📊 Choose a status:",
                status_keyboard(),
            ))
            .await?;
        Ok(())
    }

    async fn on_status_chosen(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
        status: StatusCode,
    ) -> Result<(), DripbotError> {
        let Some(FlowState::AwaitingStatusChoice { date_from, date_to }) =
            self.sessions.get(event.user_id).await
        else {
            debug!(user_id = event.user_id.0, "stale status selection ignored");
            return Ok(());
        };
        self.sessions
            .set(
                event.user_id,
                FlowState::AwaitingInfoText {
                    date_from,
                    date_to,
                    status,
                },
            )
            .await;
        self.respond(
            gateway,
            event,
            Reply::text(
                event.chat_id,
                format!(
                    "📝 Add a comment (max {INFO_MAX_CHARS} characters)\n\nExample: \"Arriving tomorrow\""
                ),
            ),
        )
        .await
    }

    async fn on_info_text(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
        date_from: OrderDate,
        date_to: OrderDate,
        status: StatusCode,
        text: &str,
    ) -> Result<(), DripbotError> {
        let info: String = text.trim().chars().take(INFO_MAX_CHARS).collect();

        let range = NewStatusRange {
            date_from,
            date_to,
            status,
            info: info.clone(),
        };
        let id = match self.store.insert_range(&range).await {
            Ok(id) => id,
            Err(err) => return self.abort_flow(gateway, event, err).await,
        };
        self.sessions.clear(event.user_id).await;

        info!(range_id = id, from = %date_from, to = %date_to, status = %status, "status range committed");

        gateway
            .send(Reply::text(
                event.chat_id,
                format!(
                    "✅ DONE!\n\n📅 Dates: {date_from} - {date_to}\n📊 Status: {}\n📝 {info}",
                    status.label()
                ),
            ))
            .await?;
        gateway
            .send(Reply::with_keyboard(
                event.chat_id,
                "⚙️ ADMIN PANEL",
                admin_keyboard(),
            ))
            .await?;
        Ok(())
    }

    async fn on_view_ranges(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
    ) -> Result<(), DripbotError> {
        if !self.ensure_admin(gateway, event).await? {
            return Ok(());
        }

        let ranges = match self.store.list_ranges().await {
            Ok(ranges) => ranges,
            Err(err) => return self.abort_flow(gateway, event, err).await,
        };

        let body = if ranges.is_empty() {
            "❌ No ranges set".to_string()
        } else {
            let mut text = "📋 ALL RANGES:\n\n".to_string();
            for range in &ranges {
                text.push_str(&format!(
                    "🔖 #{}\n📅 {} → {}\n📊 {}\n📝 {}\n⏰ {}\n➡️ /delete_{}\n\n",
                    range.id,
                    range.date_from,
                    range.date_to,
                    range.status.label(),
                    range.info,
                    range.created_at,
                    range.id,
                ));
            }
            text
        };

        gateway
            .send(Reply::with_keyboard(event.chat_id, body, admin_keyboard()))
            .await?;
        Ok(())
    }

    async fn on_delete_range(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
        id: i64,
    ) -> Result<(), DripbotError> {
        if !self.ensure_admin(gateway, event).await? {
            return Ok(());
        }

        match self.store.delete_range(id).await {
            Ok(()) => {
                info!(range_id = id, "status range deleted");
                gateway
                    .send(Reply::with_keyboard(
                        event.chat_id,
                        format!("✅ Range #{id} deleted!"),
                        admin_keyboard(),
                    ))
                    .await?;
            }
            Err(DripbotError::NotFound { .. }) => {
                gateway
                    .send(Reply::text(event.chat_id, format!("❌ Range #{id} not found")))
                    .await?;
            }
            Err(err) => return self.abort_flow(gateway, event, err).await,
        }
        Ok(())
    }

    async fn on_manage_payment(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
    ) -> Result<(), DripbotError> {
        if !self.ensure_admin(gateway, event).await? {
            return Ok(());
        }
        self.sessions.clear(event.user_id).await;
        self.sessions
            .set(event.user_id, FlowState::AwaitingOrderIdLookup)
            .await;
        gateway
            .send(Reply::text(event.chat_id, "💳 Enter the customer's order id:"))
            .await?;
        Ok(())
    }

    async fn on_order_id_lookup(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
        text: &str,
    ) -> Result<(), DripbotError> {
        let order_id = OrderId::new(text);

        let order = match self.store.order_by_order_id(&order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                // Abort to idle with a not-found signal.
                self.sessions.clear(event.user_id).await;
                gateway
                    .send(Reply::text(event.chat_id, "❌ Order not found!"))
                    .await?;
                return Ok(());
            }
            Err(err) => return self.abort_flow(gateway, event, err).await,
        };

        self.sessions
            .set(
                event.user_id,
                FlowState::AwaitingPaymentChoice {
                    order_id: order.order_id.clone(),
                },
            )
            .await;

        let paid = if order.is_paid {
            "✅ Paid"
        } else {
            "❌ Not paid"
        };
        gateway
            .send(Reply::with_keyboard(
                event.chat_id,
                format!(
                    "📦 Order: {}\n📅 Date: {}\n💳 Status: {paid}\n\nChoose a payment status:",
                    order.order_id, order.order_date
                ),
                payment_keyboard(),
            ))
            .await?;
        Ok(())
    }

    async fn on_payment_chosen(
        &self,
        gateway: &dyn ChatGateway,
        event: &InboundEvent,
        is_paid: bool,
    ) -> Result<(), DripbotError> {
        let Some(FlowState::AwaitingPaymentChoice { order_id }) =
            self.sessions.get(event.user_id).await
        else {
            debug!(user_id = event.user_id.0, "stale payment selection ignored");
            return Ok(());
        };
        self.sessions.clear(event.user_id).await;

        let paid = if is_paid { "✅ Paid" } else { "❌ Not paid" };
        match self.store.set_paid(&order_id, is_paid).await {
            Ok(()) => {
                info!(order_id = %order_id, is_paid, "payment flag updated");
                self.respond(
                    gateway,
                    event,
                    Reply::text(
                        event.chat_id,
                        format!("✅ DONE!\n\n📦 Order: {order_id}\n💳 New status: {paid}"),
                    ),
                )
                .await
            }
            Err(DripbotError::NotFound { .. }) => {
                self.respond(
                    gateway,
                    event,
                    Reply::text(event.chat_id, "❌ Order not found!"),
                )
                .await
            }
            Err(err) => self.abort_flow(gateway, event, err).await,
        }
    }
}

// --- Keyboards ---

fn client_keyboard() -> Keyboard {
    Keyboard::Menu(vec![
        vec![MenuAction::CheckStatus],
        vec![MenuAction::ChangeDate],
    ])
}

fn admin_keyboard() -> Keyboard {
    Keyboard::Menu(vec![
        vec![MenuAction::SetStatuses],
        vec![MenuAction::ViewRanges],
        vec![MenuAction::ManagePayment],
        vec![MenuAction::ExitAdmin],
    ])
}

fn start_keyboard() -> Keyboard {
    Keyboard::Inline(vec![
        vec![(
            "📝 Enter order date".to_string(),
            Selection::RegisterOrder,
        )],
        vec![("🔍 Check a date".to_string(), Selection::QuickCheck)],
    ])
}

fn status_keyboard() -> Keyboard {
    Keyboard::Inline(
        StatusCode::iter()
            .map(|code| vec![(code.label().to_string(), Selection::Status(code))])
            .collect(),
    )
}

fn payment_keyboard() -> Keyboard {
    Keyboard::Inline(vec![
        vec![("✅ Paid".to_string(), Selection::Paid(true))],
        vec![("❌ Not paid".to_string(), Selection::Paid(false))],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use dripbot_core::{ChatId, CustomerOrder, MessageId};
    use dripbot_test_utils::{MockGateway, MockStore};

    const ADMIN: UserId = UserId(1000);
    const CUSTOMER: UserId = UserId(7);

    fn engine(store: &MockStore) -> FlowEngine {
        FlowEngine::new(
            Arc::new(store.clone()),
            SessionStore::new(),
            Some(ADMIN),
        )
    }

    fn text_event(user: UserId, text: &str) -> InboundEvent {
        InboundEvent {
            user_id: user,
            chat_id: ChatId(user.0),
            message_id: None,
            kind: EventKind::Text(text.to_string()),
        }
    }

    fn select_event(user: UserId, selection: Selection) -> InboundEvent {
        InboundEvent {
            user_id: user,
            chat_id: ChatId(user.0),
            message_id: Some(MessageId("42".to_string())),
            kind: EventKind::Select(selection),
        }
    }

    fn kind_event(user: UserId, kind: EventKind) -> InboundEvent {
        InboundEvent {
            user_id: user,
            chat_id: ChatId(user.0),
            message_id: None,
            kind,
        }
    }

    async fn run_admin_range_flow(
        engine: &FlowEngine,
        gateway: &MockGateway,
        from: &str,
        to: &str,
        status: StatusCode,
        info: &str,
    ) {
        engine
            .handle_event(gateway, kind_event(ADMIN, EventKind::Menu(MenuAction::SetStatuses)))
            .await
            .unwrap();
        engine
            .handle_event(gateway, text_event(ADMIN, from))
            .await
            .unwrap();
        engine
            .handle_event(gateway, text_event(ADMIN, to))
            .await
            .unwrap();
        engine
            .handle_event(gateway, select_event(ADMIN, Selection::Status(status)))
            .await
            .unwrap();
        engine
            .handle_event(gateway, text_event(ADMIN, info))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn registration_flow_persists_order() {
        let store = MockStore::new();
        let engine = engine(&store);
        let gateway = MockGateway::new();

        engine
            .handle_event(&gateway, select_event(CUSTOMER, Selection::RegisterOrder))
            .await
            .unwrap();
        // The entry prompt edits the originating callback message.
        assert_eq!(gateway.edited_replies().await.len(), 1);

        engine
            .handle_event(&gateway, text_event(CUSTOMER, "25.11.2025"))
            .await
            .unwrap();

        let orders = store.orders().await;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_date, OrderDate::parse("25.11.2025").unwrap());
        assert!(orders[0].is_paid);
        assert_eq!(engine.sessions().active().await, 0);
        assert!(gateway.last_reply().await.body.contains("✅ Done!"));
    }

    #[tokio::test]
    async fn malformed_date_re_prompts_without_advancing() {
        let store = MockStore::new();
        let engine = engine(&store);
        let gateway = MockGateway::new();

        engine
            .handle_event(&gateway, select_event(CUSTOMER, Selection::RegisterOrder))
            .await
            .unwrap();
        engine
            .handle_event(&gateway, text_event(CUSTOMER, "5.11.2025"))
            .await
            .unwrap();

        assert_eq!(gateway.last_reply().await.body, DATE_INVALID);
        assert_eq!(
            engine.sessions().get(CUSTOMER).await,
            Some(FlowState::AwaitingOrderDate {
                intent: DateIntent::Register
            })
        );
        assert!(store.orders().await.is_empty());

        // A valid date afterwards completes the flow.
        engine
            .handle_event(&gateway, text_event(CUSTOMER, "05.11.2025"))
            .await
            .unwrap();
        assert_eq!(store.orders().await.len(), 1);
    }

    #[tokio::test]
    async fn quick_check_never_mutates_orders() {
        let store = MockStore::new();
        let engine = engine(&store);
        let gateway = MockGateway::new();

        store
            .seed_range(NewStatusRange {
                date_from: OrderDate::parse("01.11.2025").unwrap(),
                date_to: OrderDate::parse("10.11.2025").unwrap(),
                status: StatusCode::InTransit,
                info: "on the way".to_string(),
            })
            .await;

        engine
            .handle_event(&gateway, select_event(CUSTOMER, Selection::QuickCheck))
            .await
            .unwrap();
        engine
            .handle_event(&gateway, text_event(CUSTOMER, "05.11.2025"))
            .await
            .unwrap();

        assert!(store.orders().await.is_empty(), "quick check must not register");
        assert!(gateway.last_reply().await.body.contains("🚚 In transit"));
    }

    #[tokio::test]
    async fn admin_range_flow_commits_with_truncated_info() {
        let store = MockStore::new();
        let engine = engine(&store);
        let gateway = MockGateway::new();

        let long_info = "x".repeat(150);
        run_admin_range_flow(
            &engine,
            &gateway,
            "01.11.2025",
            "10.11.2025",
            StatusCode::Waiting,
            &long_info,
        )
        .await;

        let ranges = store.ranges().await;
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].info.chars().count(), INFO_MAX_CHARS);
        assert_eq!(ranges[0].status, StatusCode::Waiting);
        assert_eq!(engine.sessions().active().await, 0);

        // Admin panel keyboard is re-sent after the commit.
        let last = gateway.last_reply().await;
        assert_eq!(last.body, "⚙️ ADMIN PANEL");
        assert_eq!(last.keyboard, Some(admin_keyboard()));
    }

    #[tokio::test]
    async fn non_admin_actions_never_mutate_and_leak_nothing() {
        let store = MockStore::new();
        let engine = engine(&store);
        let gateway = MockGateway::new();

        for event in [
            kind_event(CUSTOMER, EventKind::AdminPanel),
            kind_event(CUSTOMER, EventKind::Menu(MenuAction::SetStatuses)),
            kind_event(CUSTOMER, EventKind::Menu(MenuAction::ViewRanges)),
            kind_event(CUSTOMER, EventKind::Menu(MenuAction::ManagePayment)),
            kind_event(CUSTOMER, EventKind::DeleteRange(1)),
        ] {
            engine.handle_event(&gateway, event).await.unwrap();
            let reply = gateway.last_reply().await;
            assert_eq!(reply.body, ADMIN_ONLY);
            assert!(!reply.body.contains(&ADMIN.0.to_string()));
        }

        assert!(store.ranges().await.is_empty());
        assert!(store.orders().await.is_empty());
        assert_eq!(engine.sessions().active().await, 0);
    }

    #[tokio::test]
    async fn payment_toggle_is_idempotent() {
        let store = MockStore::new();
        let engine = engine(&store);
        let gateway = MockGateway::new();

        store
            .upsert_order(&CustomerOrder {
                user_id: CUSTOMER,
                order_id: OrderId::new("AB12CD34"),
                order_date: OrderDate::parse("25.11.2025").unwrap(),
                is_paid: false,
                created_at: "25.11.2025 10:00".to_string(),
            })
            .await
            .unwrap();

        for _ in 0..2 {
            engine
                .handle_event(
                    &gateway,
                    kind_event(ADMIN, EventKind::Menu(MenuAction::ManagePayment)),
                )
                .await
                .unwrap();
            engine
                .handle_event(&gateway, text_event(ADMIN, "ab12cd34"))
                .await
                .unwrap();
            engine
                .handle_event(&gateway, select_event(ADMIN, Selection::Paid(true)))
                .await
                .unwrap();
        }

        let order = store
            .order_by_order_id(&OrderId::new("AB12CD34"))
            .await
            .unwrap()
            .unwrap();
        assert!(order.is_paid);

        // The confirmation edits the callback message in place.
        let edits = gateway.edited_replies().await;
        assert!(edits.iter().any(|(_, _, r)| r.body.contains("✅ Paid")));
    }

    #[tokio::test]
    async fn payment_lookup_of_missing_order_aborts_to_idle() {
        let store = MockStore::new();
        let engine = engine(&store);
        let gateway = MockGateway::new();

        engine
            .handle_event(
                &gateway,
                kind_event(ADMIN, EventKind::Menu(MenuAction::ManagePayment)),
            )
            .await
            .unwrap();
        engine
            .handle_event(&gateway, text_event(ADMIN, "ZZZZZZZZ"))
            .await
            .unwrap();

        assert_eq!(gateway.last_reply().await.body, "❌ Order not found!");
        assert_eq!(engine.sessions().active().await, 0);
    }

    #[tokio::test]
    async fn delete_of_missing_range_reports_not_found() {
        let store = MockStore::new();
        let engine = engine(&store);
        let gateway = MockGateway::new();

        engine
            .handle_event(&gateway, kind_event(ADMIN, EventKind::DeleteRange(99)))
            .await
            .unwrap();
        assert!(gateway.last_reply().await.body.contains("not found"));
    }

    #[tokio::test]
    async fn stale_selection_is_ignored() {
        let store = MockStore::new();
        let engine = engine(&store);
        let gateway = MockGateway::new();

        // No flow in progress: a status selection does nothing.
        engine
            .handle_event(
                &gateway,
                select_event(ADMIN, Selection::Status(StatusCode::Waiting)),
            )
            .await
            .unwrap();
        assert_eq!(gateway.sent_count().await, 0);
        assert!(gateway.edited_replies().await.is_empty());
        assert!(store.ranges().await.is_empty());
    }

    #[tokio::test]
    async fn storage_failure_aborts_flow_with_generic_message() {
        let store = MockStore::new();
        let engine = engine(&store);
        let gateway = MockGateway::new();

        engine
            .handle_event(&gateway, select_event(CUSTOMER, Selection::RegisterOrder))
            .await
            .unwrap();
        store.set_failing(true).await;
        engine
            .handle_event(&gateway, text_event(CUSTOMER, "25.11.2025"))
            .await
            .unwrap();

        assert_eq!(gateway.last_reply().await.body, GENERIC_FAILURE);
        assert_eq!(engine.sessions().active().await, 0);
    }

    #[tokio::test]
    async fn start_clears_any_in_progress_flow() {
        let store = MockStore::new();
        let engine = engine(&store);
        let gateway = MockGateway::new();

        engine
            .handle_event(&gateway, select_event(CUSTOMER, Selection::RegisterOrder))
            .await
            .unwrap();
        assert_eq!(engine.sessions().active().await, 1);

        engine
            .handle_event(&gateway, kind_event(CUSTOMER, EventKind::Start))
            .await
            .unwrap();
        assert_eq!(engine.sessions().active().await, 0);
    }

    #[tokio::test]
    async fn unpaid_order_withholds_status() {
        let store = MockStore::new();
        let engine = engine(&store);
        let gateway = MockGateway::new();

        store
            .upsert_order(&CustomerOrder {
                user_id: CUSTOMER,
                order_id: OrderId::new("AB12CD34"),
                order_date: OrderDate::parse("05.11.2025").unwrap(),
                is_paid: false,
                created_at: "25.11.2025 10:00".to_string(),
            })
            .await
            .unwrap();
        store
            .seed_range(NewStatusRange {
                date_from: OrderDate::parse("01.11.2025").unwrap(),
                date_to: OrderDate::parse("10.11.2025").unwrap(),
                status: StatusCode::Delivered,
                info: String::new(),
            })
            .await;

        engine
            .handle_event(
                &gateway,
                kind_event(CUSTOMER, EventKind::Menu(MenuAction::CheckStatus)),
            )
            .await
            .unwrap();

        let body = gateway.last_reply().await.body;
        assert!(body.contains("ORDER NOT PAID"));
        assert!(!body.contains("Delivered"));
    }

    #[tokio::test]
    async fn idle_text_gets_a_hint() {
        let store = MockStore::new();
        let engine = engine(&store);
        let gateway = MockGateway::new();

        engine
            .handle_event(&gateway, text_event(CUSTOMER, "hello"))
            .await
            .unwrap();
        assert_eq!(gateway.last_reply().await.body, IDLE_HINT);
    }
}
