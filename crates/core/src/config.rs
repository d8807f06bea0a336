//! Agent timing configuration.

use uiauto_protocol::ConfiguratorInfo;
use uiauto_runtime::Result;

use crate::agent::AgentService;

/// Adjusts the agent's timing parameters.
///
/// The agent only accepts the whole record, so each setter reads the
/// current values, changes one field, and writes the record back. An agent
/// that does not implement the configurator surface fails these calls with
/// an unsupported error; there is no silent fallback.
pub struct Configurator {
    agent: AgentService,
}

impl Configurator {
    pub fn new(agent: AgentService) -> Self {
        Self { agent }
    }

    pub async fn current(&self) -> Result<ConfiguratorInfo> {
        self.agent.get_configurator().await
    }

    pub async fn set_action_acknowledgment_timeout(&self, ms: i64) -> Result<()> {
        self.update(|info| info.action_acknowledgment_timeout = ms)
            .await
    }

    pub async fn set_key_injection_delay(&self, ms: i64) -> Result<()> {
        self.update(|info| info.key_injection_delay = ms).await
    }

    pub async fn set_scroll_acknowledgment_timeout(&self, ms: i64) -> Result<()> {
        self.update(|info| info.scroll_acknowledgment_timeout = ms)
            .await
    }

    pub async fn set_wait_for_idle_timeout(&self, ms: i64) -> Result<()> {
        self.update(|info| info.wait_for_idle_timeout = ms).await
    }

    pub async fn set_wait_for_selector_timeout(&self, ms: i64) -> Result<()> {
        self.update(|info| info.wait_for_selector_timeout = ms).await
    }

    async fn update(&self, apply: impl FnOnce(&mut ConfiguratorInfo)) -> Result<()> {
        let mut info = self.agent.get_configurator().await?;
        apply(&mut info);
        self.agent.set_configurator(&info).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{MockTransport, ScriptedReply};
    use serde_json::json;
    use uiauto_runtime::Error;

    #[tokio::test]
    async fn setter_rewrites_the_whole_record() {
        let transport = MockTransport::with_replies(vec![
            ScriptedReply::Ok(json!({
                "actionAcknowledgmentTimeout": 3000,
                "keyInjectionDelay": 0,
                "scrollAcknowledgmentTimeout": 200,
                "waitForIdleTimeout": 10000,
                "waitForSelectorTimeout": 10000
            })),
            ScriptedReply::Ok(json!({})),
        ]);
        let configurator = Configurator::new(AgentService::new(transport.clone()));

        configurator.set_wait_for_selector_timeout(500).await.unwrap();

        let calls = transport.calls();
        assert_eq!(transport.method_names(), ["getConfigurator", "setConfigurator"]);
        let written = &calls[1].1[0];
        // The changed field plus every untouched one goes back out.
        assert_eq!(written["waitForSelectorTimeout"], 500);
        assert_eq!(written["actionAcknowledgmentTimeout"], 3000);
        assert_eq!(written["scrollAcknowledgmentTimeout"], 200);
    }

    #[tokio::test]
    async fn unsupported_configurator_surface_is_fatal() {
        let transport = MockTransport::with_replies(vec![ScriptedReply::NotImplemented]);
        let configurator = Configurator::new(AgentService::new(transport));

        let err = configurator.set_key_injection_delay(50).await.unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }
}
