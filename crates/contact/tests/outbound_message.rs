use mailrelay_contact::{Error, OutboundMessage, PLACEHOLDER, Submission};

fn parse(json: &str) -> anyhow::Result<Submission> {
    Ok(serde_json::from_str(json)?)
}

#[test]
fn test_minimal_submission() -> anyhow::Result<()> {
    let submission = parse(r#"{"name":"Ana","email":"ana@test.com","message":"Hola"}"#)?;
    let message = OutboundMessage::from_submission(&submission)?;

    assert_eq!(message.subject, "New message from Ana");
    assert_eq!(message.reply_to, "ana@test.com");
    assert!(message.text.contains(&format!("Phone: {PLACEHOLDER}")));
    assert!(message.text.contains(&format!("Subject: {PLACEHOLDER}")));
    assert!(message.html.contains("Hola"));

    Ok(())
}

#[test]
fn test_subject_prefix() -> anyhow::Result<()> {
    let submission = parse(
        r#"{"name":"Ana","email":"ana@test.com","message":"Hola","subject":"Quote","phone":"+34 600 000 000"}"#,
    )?;
    let message = OutboundMessage::from_submission(&submission)?;

    assert_eq!(message.subject, "(Quote) New message from Ana");
    assert!(message.text.contains("Phone: +34 600 000 000"));
    assert!(message.text.contains("Subject: Quote"));

    Ok(())
}

#[test]
fn test_text_body_field_order() -> anyhow::Result<()> {
    let submission = parse(
        r#"{"name":"Ana","email":"ana@test.com","message":"Hola","subject":"Quote","phone":"123"}"#,
    )?;
    let text = OutboundMessage::from_submission(&submission)?.text;

    let positions: Vec<usize> = ["Name:", "Email:", "Phone:", "Subject:", "Message:"]
        .iter()
        .map(|label| text.find(label).expect("label present"))
        .collect();

    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    Ok(())
}

#[test]
fn test_html_body_escapes_user_input() -> anyhow::Result<()> {
    let submission = Submission {
        name: "<b>Eve</b>".to_owned(),
        email: "eve@test.com".to_owned(),
        phone: Some("\"555\"".to_owned()),
        subject: Some("Tom & Jerry".to_owned()),
        message: "<script>alert('x')</script>".to_owned(),
    };
    let html = OutboundMessage::from_submission(&submission)?.html;

    assert!(!html.contains("<b>Eve</b>"));
    assert!(!html.contains("<script>"));
    assert!(!html.contains("'x'"));
    assert!(!html.contains("\"555\""));
    assert!(!html.contains("Tom & Jerry"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("Tom &amp; Jerry"));

    Ok(())
}

#[test]
fn test_text_body_is_not_escaped() -> anyhow::Result<()> {
    let submission = parse(r#"{"name":"Ana","email":"ana@test.com","message":"1 < 2 & 3 > 2"}"#)?;
    let text = OutboundMessage::from_submission(&submission)?.text;

    assert!(text.contains("1 < 2 & 3 > 2"));

    Ok(())
}

#[test]
fn test_missing_keys_are_missing_fields() -> anyhow::Result<()> {
    let submission = parse(r#"{"email":"ana@test.com"}"#)?;

    assert!(matches!(
        OutboundMessage::from_submission(&submission),
        Err(Error::MissingFields)
    ));

    Ok(())
}

#[test]
fn test_invalid_email_is_rejected() -> anyhow::Result<()> {
    let submission = parse(r#"{"name":"Ana","email":"not-an-email","message":"Hola"}"#)?;
    let err = OutboundMessage::from_submission(&submission).unwrap_err();

    assert!(matches!(err, Error::InvalidEmail));
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "invalid email");

    Ok(())
}
