//! Access guard: the gate every protected request passes through.
//!
//! Per request a session is in one of three states ([`AccessState`]). Only
//! [`require_login`] moves between them; [`classify`] merely observes.

use chrono::Duration;

use crate::flash::{messages, Flash};
use crate::flow::{Flow, Redirect};
use crate::roles::Role;
use crate::session::{Identity, Session};
use crate::types::{DbId, Timestamp};

/// Idle timeout applied when none is configured (two hours).
pub const DEFAULT_SESSION_TIMEOUT_SECS: i64 = 7200;

/// Where unauthenticated clients are sent.
pub const LOGIN_PATH: &str = "/login";

/// Where authenticated clients without the required role are sent.
pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    Unauthenticated,
    Valid,
    Expired,
}

/// Classify a session without mutating it.
///
/// A session is valid while `now - login_at <= timeout_secs`.
pub fn classify(session: &Session, now: Timestamp, timeout_secs: i64) -> AccessState {
    match session.identity() {
        None => AccessState::Unauthenticated,
        Some(identity) if now - identity.login_at <= Duration::seconds(timeout_secs) => {
            AccessState::Valid
        }
        Some(_) => AccessState::Expired,
    }
}

/// Gate a request on an authenticated, unexpired session.
///
/// A valid session has its timestamp slid forward to `now`. An expired session
/// is destroyed and the client is sent to the login page with a notice.
pub fn require_login(session: &mut Session, now: Timestamp, timeout_secs: i64) -> Flow<Identity> {
    match classify(session, now, timeout_secs) {
        AccessState::Valid => {
            session.renew(now);
            match session.identity() {
                Some(identity) => Flow::Continue(identity.clone()),
                None => Flow::Redirect(login_redirect(messages::LOGIN_REQUIRED)),
            }
        }
        AccessState::Expired => {
            session.destroy();
            Flow::Redirect(login_redirect(messages::SESSION_EXPIRED))
        }
        AccessState::Unauthenticated => Flow::Redirect(login_redirect(messages::LOGIN_REQUIRED)),
    }
}

/// Secondary gate, evaluated after [`require_login`]. Never touches the session.
pub fn require_role(identity: Identity, role: Role) -> Flow<Identity> {
    if identity.role == role {
        Flow::Continue(identity)
    } else {
        Flow::Redirect(
            Redirect::to(HOME_PATH).with_flash(Flash::danger(messages::PERMISSION_DENIED)),
        )
    }
}

/// Admins may access any user record; everyone else only their own.
pub fn can_access_user(identity: &Identity, user_id: DbId) -> bool {
    identity.role.is_admin() || identity.user_id == user_id
}

fn login_redirect(message: &str) -> Redirect {
    Redirect::to(LOGIN_PATH).with_flash(Flash::info(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Lifecycle, SessionUser};
    use assert_matches::assert_matches;
    use chrono::Utc;

    const TIMEOUT: i64 = DEFAULT_SESSION_TIMEOUT_SECS;

    fn logged_in(role: Role, login_at: Timestamp) -> Session {
        let mut session = Session::new();
        session.create(
            SessionUser {
                user_id: 1,
                name: "Ana Silva",
                email: "ana@x.com",
                role,
            },
            login_at,
        );
        let (data, _) = session.into_parts();
        Session::from_data(data)
    }

    #[test]
    fn anonymous_is_sent_to_login() {
        let mut session = Session::new();
        let flow = require_login(&mut session, Utc::now(), TIMEOUT);
        assert_matches!(flow, Flow::Redirect(r) if r.to == LOGIN_PATH
            && r.flash == Some(Flash::info(messages::LOGIN_REQUIRED)));
        assert_eq!(session.lifecycle(), Lifecycle::Unchanged);
    }

    #[test]
    fn valid_session_slides_forward() {
        let now = Utc::now();
        let mut session = logged_in(Role::Staff, now - Duration::seconds(600));

        let flow = require_login(&mut session, now, TIMEOUT);
        assert_matches!(flow, Flow::Continue(identity) if identity.login_at == now);
        assert_eq!(session.identity().map(|i| i.login_at), Some(now));
        assert_eq!(session.lifecycle(), Lifecycle::Modified);
    }

    #[test]
    fn boundary_timestamp_is_still_valid() {
        let now = Utc::now();
        let session = logged_in(Role::Staff, now - Duration::seconds(TIMEOUT));
        assert_eq!(classify(&session, now, TIMEOUT), AccessState::Valid);
    }

    #[test]
    fn one_second_past_timeout_logs_out() {
        let now = Utc::now();
        let mut session = logged_in(Role::Staff, now - Duration::seconds(TIMEOUT + 1));
        assert_eq!(classify(&session, now, TIMEOUT), AccessState::Expired);

        let flow = require_login(&mut session, now, TIMEOUT);
        assert_matches!(flow, Flow::Redirect(r) if r.to == LOGIN_PATH
            && r.flash == Some(Flash::info(messages::SESSION_EXPIRED)));
        assert!(session.identity().is_none());
        assert_eq!(session.lifecycle(), Lifecycle::Destroyed);
    }

    #[test]
    fn classify_does_not_mutate() {
        let now = Utc::now();
        let session = logged_in(Role::Staff, now - Duration::seconds(TIMEOUT + 1));
        classify(&session, now, TIMEOUT);
        assert!(session.identity().is_some());
        assert_eq!(session.lifecycle(), Lifecycle::Unchanged);
    }

    #[test]
    fn staff_is_denied_admin_pages_without_logout() {
        let now = Utc::now();
        let mut session = logged_in(Role::Staff, now);
        let identity = require_login(&mut session, now, TIMEOUT)
            .into_result()
            .expect("valid session");

        let flow = require_role(identity, Role::Admin);
        assert_matches!(flow, Flow::Redirect(r) if r.to == HOME_PATH
            && r.flash == Some(Flash::danger(messages::PERMISSION_DENIED)));
        assert!(session.identity().is_some());
    }

    #[test]
    fn admin_passes_role_gate() {
        let now = Utc::now();
        let mut session = logged_in(Role::Admin, now);
        let identity = require_login(&mut session, now, TIMEOUT)
            .into_result()
            .expect("valid session");
        assert!(!require_role(identity, Role::Admin).is_redirect());
    }

    #[test]
    fn self_or_admin_access() {
        let now = Utc::now();
        let staff = logged_in(Role::Staff, now).identity().cloned().expect("identity");
        let admin = logged_in(Role::Admin, now).identity().cloned().expect("identity");

        assert!(can_access_user(&staff, 1));
        assert!(!can_access_user(&staff, 2));
        assert!(can_access_user(&admin, 2));
    }
}
