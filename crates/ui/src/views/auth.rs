use dioxus::prelude::*;

use services::SessionState;

use crate::context::AppContext;
use crate::views::AppView;

#[component]
pub fn AuthView() -> Element {
    let ctx = use_context::<AppContext>();

    rsx! {
        div { class: "auth",
            h2 { "🔐 Sign in / Register" }

            section { class: "demo-entry",
                h3 { "🎯 Play right away" }
                DemoEntry {}
                p { class: "hint",
                    "Demo scores are not saved, but every quiz feature works."
                }
            }

            if ctx.auth_enabled() {
                section { class: "login",
                    h3 { "Sign in" }
                    LoginForm {}
                }
                section { class: "register",
                    h3 { "Register" }
                    RegisterForm {}
                }
            } else {
                p { class: "hint",
                    "Configure a database to create accounts and keep your scores."
                }
            }
        }
    }
}

#[component]
fn DemoEntry() -> Element {
    let mut session = use_context::<Signal<SessionState>>();
    let mut view = use_context::<Signal<AppView>>();
    let mut name = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    rsx! {
        div { class: "form-row",
            input {
                placeholder: "Pick a nickname",
                value: "{name}",
                oninput: move |evt| name.set(evt.value()),
            }
            button {
                onclick: move |_| {
                    match session.write().enter_demo(&name()) {
                        Ok(()) => {
                            error.set(None);
                            view.set(AppView::Quiz);
                        }
                        Err(err) => error.set(Some(err.to_string())),
                    }
                },
                "Start demo"
            }
        }
        if let Some(message) = error() {
            p { class: "error", "{message}" }
        }
    }
}

#[component]
fn LoginForm() -> Element {
    let ctx = use_context::<AppContext>();
    let mut session = use_context::<Signal<SessionState>>();
    let mut view = use_context::<Signal<AppView>>();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let accounts = ctx.accounts();

    rsx! {
        div { class: "form",
            input {
                placeholder: "Email",
                value: "{email}",
                oninput: move |evt| email.set(evt.value()),
            }
            input {
                r#type: "password",
                placeholder: "Password",
                value: "{password}",
                oninput: move |evt| password.set(evt.value()),
            }
            button {
                onclick: move |_| {
                    let accounts = accounts.clone();
                    spawn(async move {
                        match accounts.login(&email(), &password()).await {
                            Ok(profile) => {
                                error.set(None);
                                session.write().sign_in(profile);
                                view.set(AppView::Quiz);
                            }
                            Err(err) => error.set(Some(err.to_string())),
                        }
                    });
                },
                "Sign in"
            }
            if let Some(message) = error() {
                p { class: "error", "{message}" }
            }
        }
    }
}

#[component]
fn RegisterForm() -> Element {
    let ctx = use_context::<AppContext>();
    let mut username = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut created = use_signal(|| false);

    let accounts = ctx.accounts();

    rsx! {
        div { class: "form",
            input {
                placeholder: "Username",
                value: "{username}",
                oninput: move |evt| username.set(evt.value()),
            }
            input {
                placeholder: "Email",
                value: "{email}",
                oninput: move |evt| email.set(evt.value()),
            }
            input {
                r#type: "password",
                placeholder: "Password",
                value: "{password}",
                oninput: move |evt| password.set(evt.value()),
            }
            input {
                r#type: "password",
                placeholder: "Confirm password",
                value: "{confirm}",
                oninput: move |evt| confirm.set(evt.value()),
            }
            button {
                onclick: move |_| {
                    let accounts = accounts.clone();
                    spawn(async move {
                        match accounts
                            .register(&username(), &email(), &password(), &confirm())
                            .await
                        {
                            Ok(_) => {
                                error.set(None);
                                created.set(true);
                            }
                            Err(err) => {
                                created.set(false);
                                error.set(Some(err.to_string()));
                            }
                        }
                    });
                },
                "Create account"
            }
            if created() {
                p { class: "success", "Account created! You can sign in now." }
            }
            if let Some(message) = error() {
                p { class: "error", "{message}" }
            }
        }
    }
}
