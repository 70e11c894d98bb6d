use crate::submission::{AnalysisClient, Session};
use crate::transcript::MessageContent;
use minijinja::{Environment, context};
use serde::Serialize;
use tokio::sync::Mutex;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

pub const TITLE: &str = "AI Powered Company Report Assistant";
pub const DESCRIPTION: &str = "Your AI Assistant to quickly summarize company reports, extract \
key metrics, and provide actionable insights, making complex data clear, transparent, and easy \
to act on for teams, investors, and employees.";

#[derive(Debug, Serialize)]
struct MessageView<'a> {
    index: usize,
    role: &'a str,
    label: &'a str,
    body: &'a str,
    preformatted: bool,
}

pub fn templates() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    // the .html suffix turns on HTML auto-escaping
    env.add_template("index.html", INDEX_TEMPLATE)?;
    Ok(env)
}

pub fn render_index(env: &Environment<'_>, session: &Session) -> Result<String, minijinja::Error> {
    let messages: Vec<MessageView> = session
        .transcript
        .iter()
        .enumerate()
        .map(|(index, message)| MessageView {
            index,
            role: message.role.as_str(),
            label: message.role.label(),
            body: message.content.as_str(),
            preformatted: matches!(message.content, MessageContent::Preformatted(_)),
        })
        .collect();

    env.get_template("index.html")?.render(context! {
        title => TITLE,
        description => DESCRIPTION,
        loading => session.loading,
        text => &session.text,
        guidelines_text => &session.guidelines_text,
        messages => messages,
    })
}

/// State behind the single page: one in-process session shared by every tab.
pub struct PageState {
    pub session: Mutex<Session>,
    pub client: AnalysisClient,
    pub templates: Environment<'static>,
}

impl PageState {
    pub fn new(client: AnalysisClient) -> Result<Self, minijinja::Error> {
        Ok(Self {
            session: Mutex::new(Session::new()),
            client,
            templates: templates()?,
        })
    }

    pub async fn render(&self) -> Result<String, minijinja::Error> {
        let session = self.session.lock().await;
        render_index(&self.templates, &session)
    }
}
