//! Notification email bodies for a new lead

use crate::config::{BusinessConfig, EmailConfig};
use crate::email::{EmailAttachment, OutboundEmail};
use crate::models::LeadSubmission;
use crate::sanitize::escape_html;

/// Assemble the owner notification for a fully-validated lead.
///
/// Every user-supplied string is HTML-escaped before interpolation, and
/// `reply_to` is set to the submitter's address so the business can respond
/// directly.
pub fn build_lead_email(
    lead: &LeadSubmission,
    email_config: &EmailConfig,
    business: &BusinessConfig,
) -> OutboundEmail {
    let service = lead
        .service
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| "Not specified".to_string());

    let postcode = escape_html(lead.postcode.trim());
    let name = escape_html(lead.name.trim());
    let phone = escape_html(lead.phone.trim());
    let email = escape_html(lead.email.trim());

    let subject = format!("New enquiry: {} ({})", service, lead.postcode.trim());

    let html = format!(
        "<h2>New enquiry via {site}</h2>\
         <table>\
         <tr><td><strong>Service</strong></td><td>{service}</td></tr>\
         <tr><td><strong>Postcode</strong></td><td>{postcode}</td></tr>\
         <tr><td><strong>Name</strong></td><td>{name}</td></tr>\
         <tr><td><strong>Phone</strong></td><td>{phone}</td></tr>\
         <tr><td><strong>Email</strong></td><td>{email}</td></tr>\
         <tr><td><strong>Photos</strong></td><td>{photos} attached</td></tr>\
         </table>",
        site = escape_html(&business.name),
        service = escape_html(&service),
        postcode = postcode,
        name = name,
        phone = phone,
        email = email,
        photos = lead.photos.len(),
    );

    let text = format!(
        "New enquiry via {site}\n\n\
         Service:  {service}\n\
         Postcode: {postcode}\n\
         Name:     {name}\n\
         Phone:    {phone}\n\
         Email:    {email}\n\
         Photos:   {photos} attached\n",
        site = business.name,
        service = service,
        postcode = lead.postcode.trim(),
        name = lead.name.trim(),
        phone = lead.phone.trim(),
        email = lead.email.trim(),
        photos = lead.photos.len(),
    );

    let attachments = lead
        .photos
        .iter()
        .map(|p| EmailAttachment {
            filename: p.filename.clone(),
            content_type: p.content_type.clone(),
            data: p.data.clone(),
        })
        .collect();

    OutboundEmail {
        from: email_config.from.clone(),
        to: email_config.recipients.clone(),
        reply_to: Some(lead.email.trim().to_string()),
        subject,
        html,
        text,
        attachments,
    }
}
