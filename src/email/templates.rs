//! HTML bodies for notification mail, rendered through askama so user text is escaped.

use askama::Template;

#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeMail<'a> {
    username: &'a str,
    base_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/login_alert.html")]
struct LoginAlertMail<'a> {
    username: &'a str,
    when: &'a str,
}

#[derive(Template)]
#[template(path = "email/important_note.html")]
struct ImportantNoteMail<'a> {
    username: &'a str,
    title: &'a str,
    category: &'a str,
}

#[derive(Template)]
#[template(path = "email/note_deleted.html")]
struct NoteDeletedMail<'a> {
    username: &'a str,
    title: &'a str,
    when: &'a str,
}

fn render(template: &impl Template) -> Result<String, String> {
    template
        .render()
        .map_err(|e| format!("Failed to render mail: {e}"))
}

pub fn render_welcome(username: &str, base_url: &str) -> Result<String, String> {
    render(&WelcomeMail { username, base_url })
}

pub fn render_login_alert(username: &str, when: &str) -> Result<String, String> {
    render(&LoginAlertMail { username, when })
}

pub fn render_important_note(username: &str, title: &str, category: &str) -> Result<String, String> {
    render(&ImportantNoteMail {
        username,
        title,
        category,
    })
}

pub fn render_note_deleted(username: &str, title: &str, when: &str) -> Result<String, String> {
    render(&NoteDeletedMail {
        username,
        title,
        when,
    })
}
