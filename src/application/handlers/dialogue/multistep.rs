//! Wallet-send and task-create flows: one field per message, one remote
//! call after the last field.

use serde_json::Value;
use tracing::{debug, info};

use super::controller::{display_field, expect_success, DialogueController, DialogueResult, CURRENCY};
use crate::domain::dialogue::grammar::parse_price;
use crate::domain::dialogue::{
    fields, parse_step_input, DialogueError, DialogueState, Reply, Step, StepFlow, Transition,
};
use crate::domain::foundation::UserId;
use crate::domain::session::Session;
use crate::ports::{BitcoinTransfer, TaskRequest};

/// Prompt shown while waiting on `step`.
pub fn step_prompt(step: Step) -> &'static str {
    match step {
        Step::WalletAddress => "Enter the recipient BTC address:",
        Step::WalletAmount => "Enter the amount in BTC:",
        Step::TaskTitle => "Enter the task title:",
        Step::TaskDesc => "Enter the task description:",
        Step::TaskPrice => "Enter the price in BTC:",
        Step::TaskDeadline => "Enter the deadline (YYYY-MM-DDTHH:MM:SSZ):",
    }
}

impl DialogueController {
    /// Stores a fresh multistep dialogue and asks for its first field.
    pub(super) async fn start_flow(&self, user_id: UserId, flow: StepFlow) -> DialogueResult {
        let state = DialogueState::multistep(user_id, flow);
        self.dialogues.set(&state).await?;
        debug!(user_id = %user_id, action = ?state.action, "Multistep flow started");
        Ok(vec![Reply::text(step_prompt(flow.first()))])
    }

    pub(super) async fn advance_step(
        &self,
        mut state: DialogueState,
        step: Step,
        raw: &str,
    ) -> DialogueResult {
        let value = parse_step_input(step, raw)?;

        match state.record(value) {
            Transition::Awaiting(next) => {
                self.dialogues.set(&state).await?;
                Ok(vec![Reply::text(step_prompt(next))])
            }
            Transition::Complete => {
                let user_id = state.user_id;
                let outcome = match self.sessions.get(user_id).await {
                    Ok(Some(session)) => self.submit_flow(&session, &state, step.flow()).await,
                    Ok(None) => Err(DialogueError::NotAuthenticated),
                    Err(err) => Err(err.into()),
                };
                self.finish(user_id, outcome).await
            }
        }
    }

    async fn submit_flow(
        &self,
        session: &Session,
        state: &DialogueState,
        flow: StepFlow,
    ) -> DialogueResult {
        match flow {
            StepFlow::WalletSend => self.send_bitcoin(session, state).await,
            StepFlow::TaskCreate => self.create_task(session, state).await,
        }
    }

    async fn send_bitcoin(&self, session: &Session, state: &DialogueState) -> DialogueResult {
        let transfer = BitcoinTransfer {
            to: collected(state, fields::ADDRESS),
            amount: collected(state, fields::AMOUNT),
        };
        let response = expect_success(self.gateway.send_bitcoin(&session.token, &transfer).await?)?;
        info!(user_id = %session.user_id, status = response.status, "Bitcoin transfer accepted");

        let to = display_field(&response, "to").unwrap_or(transfer.to);
        let remaining = display_field(&response, "remaining").unwrap_or(transfer.amount);
        let commission = display_field(&response, "commission").unwrap_or_else(|| "0".to_string());
        Ok(vec![Reply::text(format!(
            "Transaction sent\n\nAddress: {}\nAmount: {} {currency}\nCommission: {} {currency}",
            to,
            remaining,
            commission,
            currency = CURRENCY,
        ))])
    }

    async fn create_task(&self, session: &Session, state: &DialogueState) -> DialogueResult {
        let request = TaskRequest {
            title: collected(state, fields::TITLE),
            description: collected(state, fields::DESCRIPTION),
            price: parse_price(state.field(fields::PRICE).unwrap_or_default())?,
            currency: CURRENCY.to_string(),
            deadline: collected(state, fields::DEADLINE),
        };
        let response = expect_success(self.gateway.create_task(&session.token, &request).await?)?;
        info!(user_id = %session.user_id, status = response.status, "Task created");

        let title = response
            .json
            .as_ref()
            .and_then(|body| body.get("task"))
            .and_then(|task| task.get("title"))
            .and_then(Value::as_str)
            .unwrap_or(&request.title);
        Ok(vec![Reply::text(format!("Task created: {}", title))])
    }
}

fn collected(state: &DialogueState, field: &str) -> String {
    state.field(field).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::domain::dialogue::{DialogueAction, MenuKey};
    use crate::domain::foundation::UserId;
    use serde_json::json;

    async fn send(fx: &Fixture, user_id: UserId, text: &str) -> DialogueResult {
        fx.controller.on_free_text_input(user_id, text).await
    }

    mod wallet_send {
        use super::*;

        async fn started(gateway: MockRemoteGateway) -> Fixture {
            let fx = Fixture::new(gateway);
            fx.sign_in(alice(), "jwt").await;
            fx.controller
                .on_menu_action(alice(), MenuKey::WalletSend)
                .await
                .unwrap();
            fx
        }

        #[tokio::test]
        async fn address_then_amount_sends_transfer() {
            let fx = started(MockRemoteGateway::new().with_json(
                200,
                json!({"to": "bc1qdest", "remaining": "0.4", "commission": 0.0001}),
            ))
            .await;

            let replies = send(&fx, alice(), "  bc1qdest ").await.unwrap();
            assert_eq!(replies[0].text, "Enter the amount in BTC:");

            let replies = send(&fx, alice(), "0.5").await.unwrap();
            assert_eq!(
                replies[0].text,
                "Transaction sent\n\nAddress: bc1qdest\nAmount: 0.4 BTC\nCommission: 0.0001 BTC"
            );
            assert_eq!(
                fx.gateway.calls(),
                vec![GatewayCall::SendBitcoin {
                    token: "jwt".to_string(),
                    transfer: BitcoinTransfer {
                        to: "bc1qdest".to_string(),
                        amount: "0.5".to_string()
                    }
                }]
            );
            assert!(fx.dialogue(alice()).await.is_none());
        }

        #[tokio::test]
        async fn missing_result_fields_fall_back_to_input() {
            let fx = started(MockRemoteGateway::new().with_response(200, "sent")).await;
            send(&fx, alice(), "bc1qdest").await.unwrap();

            let replies = send(&fx, alice(), "0.5").await.unwrap();
            assert_eq!(
                replies[0].text,
                "Transaction sent\n\nAddress: bc1qdest\nAmount: 0.5 BTC\nCommission: 0 BTC"
            );
        }

        #[tokio::test]
        async fn http_error_ends_flow() {
            let fx = started(MockRemoteGateway::new().with_response(400, "insufficient funds")).await;
            send(&fx, alice(), "bc1qdest").await.unwrap();

            let err = send(&fx, alice(), "100").await.unwrap_err();
            assert_eq!(err, DialogueError::http(400, "insufficient funds"));
            assert!(fx.dialogue(alice()).await.is_none());
        }

        #[tokio::test]
        async fn blank_step_input_retries_in_place() {
            let fx = started(MockRemoteGateway::new()).await;
            let before = fx.dialogue(alice()).await;

            let err = send(&fx, alice(), "   ").await.unwrap_err();
            assert!(err.preserves_dialogue());
            assert_eq!(fx.dialogue(alice()).await, before);
        }

        #[tokio::test]
        async fn session_lost_mid_flow_is_not_authenticated() {
            let fx = started(MockRemoteGateway::new().with_json(200, json!({}))).await;
            send(&fx, alice(), "bc1qdest").await.unwrap();
            fx.sessions.delete(alice()).await.unwrap();

            let err = send(&fx, alice(), "0.5").await.unwrap_err();
            assert_eq!(err, DialogueError::NotAuthenticated);
            assert!(fx.dialogue(alice()).await.is_none());
            assert_eq!(fx.gateway.call_count(), 0);
            assert_eq!(fx.gateway.pending_responses(), 1);
        }
    }

    mod task_create {
        use super::*;

        async fn started(gateway: MockRemoteGateway) -> Fixture {
            let fx = Fixture::new(gateway);
            fx.sign_in(alice(), "jwt").await;
            fx.controller
                .on_menu_action(alice(), MenuKey::TaskCreate)
                .await
                .unwrap();
            fx
        }

        #[tokio::test]
        async fn four_steps_create_task() {
            let fx = started(
                MockRemoteGateway::new().with_json(200, json!({"task": {"id": 7, "title": "Logo"}})),
            )
            .await;

            assert_eq!(
                send(&fx, alice(), "Logo").await.unwrap()[0].text,
                "Enter the task description:"
            );
            assert_eq!(
                send(&fx, alice(), "A vector logo").await.unwrap()[0].text,
                "Enter the price in BTC:"
            );
            assert_eq!(
                send(&fx, alice(), "0.0015").await.unwrap()[0].text,
                "Enter the deadline (YYYY-MM-DDTHH:MM:SSZ):"
            );
            let replies = send(&fx, alice(), "2026-12-31T23:59:59Z").await.unwrap();
            assert_eq!(replies[0].text, "Task created: Logo");

            assert_eq!(
                fx.gateway.calls(),
                vec![GatewayCall::CreateTask {
                    token: "jwt".to_string(),
                    request: TaskRequest {
                        title: "Logo".to_string(),
                        description: "A vector logo".to_string(),
                        price: 0.0015,
                        currency: "BTC".to_string(),
                        deadline: "2026-12-31T23:59:59Z".to_string(),
                    }
                }]
            );
            assert!(fx.dialogue(alice()).await.is_none());
        }

        #[tokio::test]
        async fn invalid_price_keeps_step() {
            let fx = started(MockRemoteGateway::new()).await;
            send(&fx, alice(), "Logo").await.unwrap();
            send(&fx, alice(), "desc").await.unwrap();

            let err = send(&fx, alice(), "cheap").await.unwrap_err();
            assert!(matches!(err, DialogueError::MalformedInput { .. }));

            let state = fx.dialogue(alice()).await.unwrap();
            assert_eq!(state.action, DialogueAction::AskTaskPrice);
            assert_eq!(state.field(fields::DESCRIPTION), Some("desc"));
            assert_eq!(state.field(fields::PRICE), None);
        }

        #[tokio::test]
        async fn invalid_deadline_keeps_collected_fields() {
            let fx = started(MockRemoteGateway::new()).await;
            for input in ["Logo", "desc", "1"] {
                send(&fx, alice(), input).await.unwrap();
            }

            assert!(send(&fx, alice(), "next friday").await.is_err());
            let state = fx.dialogue(alice()).await.unwrap();
            assert_eq!(state.action, DialogueAction::AskTaskDeadline);
            assert_eq!(state.collected.len(), 3);
            assert_eq!(fx.gateway.call_count(), 0);
        }

        #[tokio::test]
        async fn flows_of_different_users_do_not_mix() {
            let fx = started(MockRemoteGateway::new()).await;
            fx.sign_in(bob(), "jwt-bob").await;
            fx.controller
                .on_menu_action(bob(), MenuKey::WalletSend)
                .await
                .unwrap();

            send(&fx, alice(), "Logo").await.unwrap();
            send(&fx, bob(), "bc1qbob").await.unwrap();

            let alice_state = fx.dialogue(alice()).await.unwrap();
            let bob_state = fx.dialogue(bob()).await.unwrap();
            assert_eq!(alice_state.field(fields::TITLE), Some("Logo"));
            assert_eq!(alice_state.field(fields::ADDRESS), None);
            assert_eq!(bob_state.field(fields::ADDRESS), Some("bc1qbob"));
            assert_eq!(bob_state.field(fields::TITLE), None);
        }
    }
}
