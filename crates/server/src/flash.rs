//! One-shot messages carried to the next rendered page in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use service::registration::RegistrationOutcome;

pub const FLASH_COOKIE: &str = "flash";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flash {
    EventFull,
    AlreadyRegistered,
    Registered,
    EventCreated,
    EventEdited,
    EventDeleted,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    Success,
    Warning,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Warning => "warning",
        }
    }
}

/// What a page template needs to show a flash.
#[derive(Clone, Debug)]
pub struct FlashView {
    pub level: &'static str,
    pub message: &'static str,
}

impl Flash {
    const ALL: [Flash; 6] = [
        Flash::EventFull,
        Flash::AlreadyRegistered,
        Flash::Registered,
        Flash::EventCreated,
        Flash::EventEdited,
        Flash::EventDeleted,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Flash::EventFull => "event_full",
            Flash::AlreadyRegistered => "already_registered",
            Flash::Registered => "registered",
            Flash::EventCreated => "event_created",
            Flash::EventEdited => "event_edited",
            Flash::EventDeleted => "event_deleted",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.code() == code)
    }

    pub fn level(&self) -> Level {
        match self {
            Flash::EventFull | Flash::AlreadyRegistered => Level::Warning,
            _ => Level::Success,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Flash::EventFull => "This Event is Full!",
            Flash::AlreadyRegistered => "You Are Already Registered For This Event!",
            Flash::Registered => "Registration Successful!",
            Flash::EventCreated => "Event Creation Successful!",
            Flash::EventEdited => "Edit Event Successful!",
            Flash::EventDeleted => "Event Deletion Successful!",
        }
    }

    pub fn view(&self) -> FlashView {
        FlashView { level: self.level().as_str(), message: self.message() }
    }
}

impl From<&RegistrationOutcome> for Flash {
    fn from(outcome: &RegistrationOutcome) -> Self {
        match outcome {
            RegistrationOutcome::Registered { .. } => Flash::Registered,
            RegistrationOutcome::EventFull => Flash::EventFull,
            RegistrationOutcome::AlreadyRegistered => Flash::AlreadyRegistered,
        }
    }
}

fn cookie(value: &'static str) -> Cookie<'static> {
    let mut c = Cookie::new(FLASH_COOKIE, value);
    c.set_path("/");
    c.set_http_only(true);
    c.set_same_site(SameSite::Lax);
    c
}

/// Queue a message for the next page.
pub fn push(jar: CookieJar, flash: Flash) -> CookieJar {
    jar.add(cookie(flash.code()))
}

/// Pop the pending message, if any. Unknown codes are dropped silently.
pub fn take(jar: CookieJar) -> (CookieJar, Option<FlashView>) {
    let Some(code) = jar.get(FLASH_COOKIE).map(|c| c.value().to_string()) else {
        return (jar, None);
    };
    let jar = jar.remove(cookie(""));
    (jar, Flash::from_code(&code).map(|f| f.view()))
}
