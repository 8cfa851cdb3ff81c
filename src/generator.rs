use std::time::Duration;

use serde::Serialize;

use crate::config::Config;
use crate::data_models::{GenerationResult, PromptRequest};
use crate::error::GenerationError;

/// Low randomness keeps the section layout stable across repeated calls.
pub const TEMPERATURE: f32 = 0.5;
/// Output cap applied to the link-aware template only.
pub const LINK_TEMPLATE_MAX_TOKENS: u32 = 1000;

const SUMMARY_SECTIONS: &str = "\
你是一个专业的英国房产中介。请根据以下房源描述，为客户写一份简洁、专业且美观的中文房源总结。

【格式要求】：
1. 🏠【房源概览】：一句话总结卖点。
2. 📍【地理位置】：简述地段、邮编、最近地铁站及周边大学（如KCL, LSE, UCL等）。
3. 🏡【内饰详情】：房型、家具情况、采光及公寓配套（如健身房、前台）。
4. 💰【租金详情】：明确标注月租(PCM)并计算出周租(PW = 月租 / 4.33)。
5. 📅【入住时间】：明确标出。
";

const SUMMARY_RULES: &str = "
禁止出现任何解释性字眼或原文中没有的虚假信息。

描述原文：
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    /// Five sections, meant to be pasted straight to a customer.
    CustomerSummary,
    /// Same five sections plus one echoing the listing link.
    SummaryWithLink,
}

impl PromptTemplate {
    pub fn for_request(request: &PromptRequest) -> PromptTemplate {
        match request.source_url {
            Some(_) => PromptTemplate::SummaryWithLink,
            None => PromptTemplate::CustomerSummary,
        }
    }

    /// Inputs are interpolated once, so braces inside them are never re-expanded.
    pub fn render(&self, request: &PromptRequest) -> String {
        let description = request.description.trim();
        match self {
            PromptTemplate::CustomerSummary => {
                format!("{SUMMARY_SECTIONS}{SUMMARY_RULES}{description}\n")
            }
            PromptTemplate::SummaryWithLink => {
                let url = request.source_url.as_deref().unwrap_or_default();
                format!("{SUMMARY_SECTIONS}6. 🔗【房源链接】：{url}\n{SUMMARY_RULES}{description}\n")
            }
        }
    }

    pub fn max_tokens(&self) -> Option<u32> {
        match self {
            PromptTemplate::CustomerSummary => None,
            PromptTemplate::SummaryWithLink => Some(LINK_TEMPLATE_MAX_TOKENS),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Single-turn client for an OpenAI-compatible chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct SummaryGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
}

impl SummaryGenerator {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<SummaryGenerator, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Transport(format!("failed to build http client: {e}")))?;
        Ok(SummaryGenerator {
            client,
            endpoint: endpoint.into(),
            api_key,
            model: model.into(),
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<SummaryGenerator, GenerationError> {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.model.clone(),
            config.generation_timeout,
        )
    }

    pub fn build_request<'a>(
        &'a self,
        template: PromptTemplate,
        prompt: &'a str,
    ) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: template.max_tokens(),
        }
    }

    /// Returns the service's text untouched. No retry and no caching.
    pub async fn generate(
        &self,
        request: &PromptRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;

        let template = PromptTemplate::for_request(request);
        let prompt = template.render(request);
        let body = self.build_request(template, &prompt);

        log::info!("requesting summary from {} ({:?})", self.endpoint, template);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let raw = response.text().await.map_err(|e| self.transport_error(e))?;
        if !status.is_success() {
            let message = parse_error_message(&raw).unwrap_or(raw);
            return Err(GenerationError::Status { status, message });
        }

        let text = extract_content(&raw)?;
        Ok(GenerationResult { text })
    }

    fn transport_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout(self.timeout)
        } else {
            GenerationError::Transport(e.to_string())
        }
    }
}

fn parse_error_message(raw_json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw_json).ok()?;
    let message = value.get("error")?.get("message")?.as_str()?.to_owned();
    Some(message)
}

/// `choices[0].message.content` of a chat-completion response.
pub fn extract_content(raw_json: &str) -> Result<String, GenerationError> {
    let value: serde_json::Value = serde_json::from_str(raw_json)
        .map_err(|e| GenerationError::MalformedResponse(format!("body is not JSON: {e}")))?;
    value
        .pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .map(|s| s.to_owned())
        .ok_or_else(|| {
            GenerationError::MalformedResponse(
                "missing `choices[0].message.content` in response".to_owned(),
            )
        })
}
