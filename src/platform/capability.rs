// SPDX-License-Identifier: MPL-2.0
//! Mobile vs desktop detection.

use std::fmt;

/// Agent substrings that identify a mobile-class device.
const MOBILE_AGENT_MARKERS: [&str; 4] = ["android", "iphone", "ipad", "ipod"];

/// How the AR popup presents the current configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Desktop: show a hand-off link for a mobile device.
    QrHandoff,
    /// Mobile: inline model preview with an AR activation button.
    InlineAr,
}

impl Presentation {
    #[must_use]
    pub fn is_mobile(self) -> bool {
        matches!(self, Presentation::InlineAr)
    }
}

/// Answers the questions the AR flow needs about the current device.
pub trait DeviceCapabilities: fmt::Debug + Send + Sync {
    fn presentation(&self) -> Presentation;

    /// Whether the device can place the model in the camera view.
    fn supports_ar(&self) -> bool {
        self.presentation().is_mobile()
    }
}

/// Classifies a device from its user agent string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentProbe {
    user_agent: String,
    supports_ar: bool,
}

impl UserAgentProbe {
    pub fn new(user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        let supports_ar = is_mobile_agent(&user_agent);
        Self {
            user_agent,
            supports_ar,
        }
    }

    /// Overrides AR support, e.g. for a mobile agent without an AR runtime.
    #[must_use]
    pub fn with_ar_support(mut self, supports_ar: bool) -> Self {
        self.supports_ar = supports_ar;
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl DeviceCapabilities for UserAgentProbe {
    fn presentation(&self) -> Presentation {
        if is_mobile_agent(&self.user_agent) {
            Presentation::InlineAr
        } else {
            Presentation::QrHandoff
        }
    }

    fn supports_ar(&self) -> bool {
        self.supports_ar
    }
}

/// Classifies the device this binary was built for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemProbe;

impl DeviceCapabilities for SystemProbe {
    fn presentation(&self) -> Presentation {
        if cfg!(any(target_os = "android", target_os = "ios")) {
            Presentation::InlineAr
        } else {
            Presentation::QrHandoff
        }
    }
}

/// Case-insensitive match of the mobile agent markers.
#[must_use]
pub fn is_mobile_agent(user_agent: &str) -> bool {
    let agent = user_agent.to_ascii_lowercase();
    MOBILE_AGENT_MARKERS
        .iter()
        .any(|marker| agent.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP_FIREFOX: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
    const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) \
         AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1";

    #[test]
    fn desktop_agent_gets_handoff() {
        let probe = UserAgentProbe::new(DESKTOP_FIREFOX);
        assert_eq!(probe.presentation(), Presentation::QrHandoff);
        assert!(!probe.supports_ar());
    }

    #[test]
    fn mobile_agents_get_inline_ar() {
        for agent in [IPHONE_SAFARI, "Dalvik/2.1.0 (Linux; U; Android 14)", "iPad", "IPOD touch"] {
            let probe = UserAgentProbe::new(agent);
            assert_eq!(probe.presentation(), Presentation::InlineAr, "{agent}");
            assert!(probe.supports_ar());
        }
    }

    #[test]
    fn ar_support_can_be_overridden() {
        let probe = UserAgentProbe::new(IPHONE_SAFARI).with_ar_support(false);
        assert!(probe.presentation().is_mobile());
        assert!(!probe.supports_ar());
    }

    #[test]
    fn empty_agent_is_desktop() {
        assert!(!is_mobile_agent(""));
    }

    #[test]
    fn system_probe_matches_build_target() {
        let expected = if cfg!(any(target_os = "android", target_os = "ios")) {
            Presentation::InlineAr
        } else {
            Presentation::QrHandoff
        };
        assert_eq!(SystemProbe.presentation(), expected);
    }
}
