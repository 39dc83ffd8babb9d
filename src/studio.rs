//! Session-scoped generation desk.
//!
//! The studio holds the form state of the AI studio and the single-flight
//! latch around generation requests. The host dispatches the request that
//! [`Studio::submit`] hands out and reports back through [`Studio::settle`].

use crate::gateway::{
    AspectRatio, Attachment, GenerationRequest, GenerationResult, GenerationTool, ImageSize,
};
use tracing::debug;

/// Shown in place of an analysis that produced no result.
pub const ANALYSIS_TIMEOUT_TEXT: &str = "Analysis node timeout. Verify connection.";

/// Shown in place of a style consultation that produced no result.
pub const STYLE_ADVICE_UNSTABLE_TEXT: &str =
    "The neural link is currently unstable. Please verify your connection.";

#[derive(Debug, Clone, Copy)]
struct InFlight {
    ticket: u64,
    /// Text recorded when the request settles without a result.
    fallback: Option<&'static str>,
}

#[derive(Debug, Default)]
pub struct Studio {
    pub tool: GenerationTool,
    pub prompt: String,
    pub image_size: ImageSize,
    pub aspect_ratio: AspectRatio,
    pub attachment: Option<Attachment>,
    next_ticket: u64,
    in_flight: Option<InFlight>,
    last_result: Option<GenerationResult>,
    last_error: Option<String>,
    history: Vec<GenerationResult>,
}

impl Studio {
    pub fn is_generating(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight_ticket(&self) -> Option<u64> {
        self.in_flight.map(|in_flight| in_flight.ticket)
    }

    pub fn last_result(&self) -> Option<&GenerationResult> {
        self.last_result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Every result produced this session, oldest first.
    pub fn history(&self) -> &[GenerationResult] {
        &self.history
    }

    pub fn select_tool(&mut self, tool: GenerationTool) {
        self.tool = tool;
    }

    /// The request described by the current form fields.
    pub fn draft_request(&self) -> GenerationRequest {
        GenerationRequest {
            tool: self.tool,
            prompt: self.prompt.clone(),
            image_size: self.image_size,
            aspect_ratio: self.aspect_ratio,
            attachment: match self.tool {
                GenerationTool::Analysis => self.attachment.clone(),
                _ => None,
            },
        }
    }

    /// Submits the form. See [`Studio::submit_request`].
    pub fn submit(&mut self) -> Option<(u64, GenerationRequest)> {
        let request = self.draft_request();
        self.submit_request(request)
    }

    /// Asks the stylist about `measurements`, through the same latch.
    pub fn submit_style_advice(&mut self, measurements: &str) -> Option<(u64, GenerationRequest)> {
        self.take_latch(
            GenerationRequest::style_advice(measurements),
            Some(STYLE_ADVICE_UNSTABLE_TEXT),
        )
    }

    /// Takes the latch for `request`.
    ///
    /// Returns `None` without touching any state while another request is in
    /// flight or when the request has nothing to generate from.
    pub fn submit_request(
        &mut self,
        request: GenerationRequest,
    ) -> Option<(u64, GenerationRequest)> {
        let fallback = match request.tool {
            GenerationTool::Analysis => Some(ANALYSIS_TIMEOUT_TEXT),
            GenerationTool::Image | GenerationTool::Video => None,
        };
        self.take_latch(request, fallback)
    }

    fn take_latch(
        &mut self,
        request: GenerationRequest,
        fallback: Option<&'static str>,
    ) -> Option<(u64, GenerationRequest)> {
        if self.in_flight.is_some() {
            debug!(tool = %request.tool, "generation already in flight, ignoring submit");
            return None;
        }
        if !request.is_submittable() {
            return None;
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.in_flight = Some(InFlight { ticket, fallback });
        self.last_result = None;
        self.last_error = None;
        Some((ticket, request))
    }

    /// Records the outcome of the request holding `ticket` and releases the
    /// latch. Outcomes for any other ticket are dropped; returns whether the
    /// outcome was applied.
    pub fn settle(
        &mut self,
        ticket: u64,
        outcome: Result<Option<GenerationResult>, String>,
    ) -> bool {
        let Some(in_flight) = self.in_flight else {
            return false;
        };
        if in_flight.ticket != ticket {
            return false;
        }

        self.in_flight = None;
        match outcome {
            Ok(Some(result)) => {
                self.history.push(result.clone());
                self.last_result = Some(result);
            }
            Ok(None) => {
                if let Some(text) = in_flight.fallback {
                    self.last_result = Some(GenerationResult::Text {
                        text: text.to_string(),
                    });
                }
            }
            Err(message) => self.last_error = Some(message),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_studio(prompt: &str) -> Studio {
        Studio {
            prompt: prompt.to_string(),
            ..Studio::default()
        }
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let mut studio = image_studio("tweed waistcoat");
        let (ticket, request) = studio.submit().expect("first submit starts a request");
        assert_eq!(request.tool, GenerationTool::Image);
        assert!(studio.is_generating());

        assert!(studio.submit().is_none());
        assert_eq!(studio.in_flight_ticket(), Some(ticket));
        assert!(studio.history().is_empty());
    }

    #[test]
    fn empty_media_prompt_does_not_take_the_latch() {
        let mut studio = image_studio("   ");
        assert!(studio.submit().is_none());
        assert!(!studio.is_generating());

        studio.select_tool(GenerationTool::Analysis);
        assert!(studio.submit().is_some());
    }

    #[test]
    fn settle_records_result_and_releases_latch() {
        let mut studio = image_studio("linen suit");
        let (ticket, _) = studio.submit().expect("submit");
        let result = GenerationResult::Image {
            data_uri: "data:image/png;base64,AAAA".to_string(),
        };

        assert!(studio.settle(ticket, Ok(Some(result.clone()))));
        assert!(!studio.is_generating());
        assert_eq!(studio.last_result(), Some(&result));
        assert_eq!(studio.history().len(), 1);

        let (next, _) = studio.submit().expect("latch is free again");
        assert!(next > ticket);
        assert!(studio.last_result().is_none());
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut studio = image_studio("overcoat");
        let (ticket, _) = studio.submit().expect("submit");

        assert!(!studio.settle(ticket + 1, Ok(None)));
        assert!(studio.is_generating());
        assert!(studio.settle(ticket, Err("credential selection was dismissed".into())));
        assert_eq!(studio.last_error(), Some("credential selection was dismissed"));
        assert!(!studio.settle(ticket, Ok(None)));
    }

    #[test]
    fn absent_analysis_result_reports_timeout_text() {
        let mut studio = Studio::default();
        studio.select_tool(GenerationTool::Analysis);
        let (ticket, _) = studio.submit().expect("analysis may run without a prompt");

        studio.settle(ticket, Ok(None));
        assert_eq!(
            studio.last_result(),
            Some(&GenerationResult::Text {
                text: ANALYSIS_TIMEOUT_TEXT.to_string()
            })
        );
    }

    #[test]
    fn absent_style_advice_reports_unstable_link() {
        let mut studio = Studio::default();
        let (ticket, request) = studio
            .submit_style_advice("chest 98cm")
            .expect("advice may run while idle");
        assert_eq!(request.tool, GenerationTool::Analysis);
        assert!(studio.submit_style_advice("chest 98cm").is_none());

        studio.settle(ticket, Ok(None));
        assert_eq!(
            studio.last_result(),
            Some(&GenerationResult::Text {
                text: STYLE_ADVICE_UNSTABLE_TEXT.to_string()
            })
        );
    }

    #[test]
    fn absent_media_result_leaves_nothing_behind() {
        let mut studio = image_studio("pleated skirt");
        let (ticket, _) = studio.submit().expect("submit");

        assert!(studio.settle(ticket, Ok(None)));
        assert!(studio.last_result().is_none());
        assert!(studio.last_error().is_none());
    }

    #[test]
    fn attachment_only_travels_with_analysis() {
        let mut studio = image_studio("fit check");
        studio.attachment = Attachment::from_data_uri("data:image/png;base64,aGVsbG8=");
        assert!(studio.draft_request().attachment.is_none());

        studio.select_tool(GenerationTool::Analysis);
        assert!(studio.draft_request().attachment.is_some());
    }
}
