//! Email notification for contact and career submissions
//!
//! Notifications are fire-and-forget: the primary resource operation has
//! already succeeded by the time a send is attempted, so failures are
//! logged and swallowed, never propagated to the caller.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use presswork_common::config::SmtpSettings;
use presswork_common::db::models::{CareerApplication, ContactSubmission};
use presswork_common::{Error, Result};
use std::sync::Arc;
use tracing::warn;

pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    admin: Mailbox,
}

impl Mailer {
    pub fn from_settings(settings: &SmtpSettings) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| Error::Config(format!("SMTP relay {}: {}", settings.host, e)))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        let from = format!("Presswork <{}>", settings.from_address)
            .parse::<Mailbox>()
            .map_err(|e| Error::Config(format!("Invalid from address: {}", e)))?;
        let admin = settings
            .admin_address
            .parse::<Mailbox>()
            .map_err(|e| Error::Config(format!("Invalid admin address: {}", e)))?;

        Ok(Self {
            transport,
            from,
            admin,
        })
    }

    async fn send_html(&self, to: Mailbox, subject: &str, html: String) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| Error::Internal(format!("Failed to build email: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| Error::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }

    /// Admin notification for a new contact submission
    pub async fn send_contact_notification(&self, contact: &ContactSubmission) -> Result<()> {
        let html = contact_admin_template(contact);
        self.send_html(
            self.admin.clone(),
            &format!("New Contact Form Submission: {}", contact.subject),
            html,
        )
        .await
    }

    /// Applicant acknowledgement plus admin notification for a new
    /// job application
    pub async fn send_career_emails(&self, career: &CareerApplication) -> Result<()> {
        let applicant: Mailbox = career
            .email
            .parse()
            .map_err(|e| Error::Internal(format!("Invalid applicant address: {}", e)))?;

        self.send_html(
            applicant,
            "Thank you for your job application",
            career_applicant_template(career),
        )
        .await?;

        self.send_html(
            self.admin.clone(),
            "New Job Application Received",
            career_admin_template(career),
        )
        .await
    }
}

/// Spawn a contact notification without blocking the request
pub fn notify_contact(mailer: Option<Arc<Mailer>>, contact: ContactSubmission) {
    let Some(mailer) = mailer else { return };
    tokio::spawn(async move {
        if let Err(e) = mailer.send_contact_notification(&contact).await {
            warn!("Contact notification email failed: {}", e);
        }
    });
}

/// Spawn career notification emails without blocking the request
pub fn notify_career(mailer: Option<Arc<Mailer>>, career: CareerApplication) {
    let Some(mailer) = mailer else { return };
    tokio::spawn(async move {
        if let Err(e) = mailer.send_career_emails(&career).await {
            warn!("Career notification emails failed: {}", e);
        }
    });
}

fn optional(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

fn contact_admin_template(contact: &ContactSubmission) -> String {
    format!(
        "<h2>New Contact Form Submission</h2>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Company:</strong> {}</p>\
         <p><strong>Phone:</strong> {}</p>\
         <p><strong>Subject:</strong> {}</p>\
         <p><strong>Message:</strong> {}</p>\
         <p><strong>Budget:</strong> {}</p>\
         <p><strong>Timeline:</strong> {}</p>",
        contact.name,
        contact.email,
        optional(&contact.company),
        optional(&contact.phone),
        contact.subject,
        contact.message,
        optional(&contact.budget),
        optional(&contact.timeline),
    )
}

fn career_applicant_template(career: &CareerApplication) -> String {
    format!(
        "<h2>Thank you for applying!</h2>\
         <p>Dear <strong>{}</strong>,</p>\
         <p>We have received your application for the <strong>{}</strong> \
         position and will review it shortly.</p>\
         <h3>Application Details</h3>\
         <ul>\
         <li><strong>Position:</strong> {}</li>\
         <li><strong>Email:</strong> {}</li>\
         <li><strong>Phone:</strong> {}</li>\
         </ul>\
         <p>Our team will contact you soon.</p>",
        career.name, career.position, career.position, career.email, career.phone,
    )
}

fn career_admin_template(career: &CareerApplication) -> String {
    format!(
        "<h2>New Job Application Received</h2>\
         <ul>\
         <li>Name: {}</li>\
         <li>Position: {}</li>\
         <li>Email: {}</li>\
         <li>Phone: {}</li>\
         <li>Experience: {}</li>\
         <li>Current company: {}</li>\
         <li>Expected salary: {}</li>\
         <li>Notice period: {}</li>\
         </ul>\
         <p>Review the application in the admin dashboard.</p>",
        career.name,
        career.position,
        career.email,
        career.phone,
        career.experience,
        career.current_company,
        career.expected_salary,
        career.notice_period,
    )
}
