//! boxview - submit an image to the detection service and browse results

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use boxview::config::ViewerConfig;
use boxview::ui::Ui;
use boxview::{
    DetectClient, DisplayRect, Offset, Session, SessionEvent, UploadFile,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Image file to submit (JPEG, PNG, or WEBP).
    image: PathBuf,
    /// Detect endpoint URL (overrides config/env).
    #[arg(long)]
    endpoint: Option<String>,
    /// Filter query applied to the rendered results.
    #[arg(long, default_value = "")]
    filter: String,
    /// Activate the detection with this index after rendering.
    #[arg(long)]
    select: Option<usize>,
    /// Display width used for box mapping.
    #[arg(long, default_value_t = 800.0)]
    display_width: f64,
    /// Display height used for box mapping.
    #[arg(long, default_value_t = 600.0)]
    display_height: f64,
    /// Probe the service health endpoint before uploading.
    #[arg(long)]
    check_health: bool,
    /// Emit the rendered state as JSON lines instead of text.
    #[arg(long)]
    json: bool,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let ui = Ui::from_flag(Some(&args.ui), std::io::stderr().is_terminal());

    let mut cfg = ViewerConfig::load()?;
    if let Some(endpoint) = args.endpoint.clone() {
        cfg.endpoint = endpoint;
    }

    let client = DetectClient::with_timeout(&cfg.endpoint, cfg.timeout)?;
    if args.check_health {
        let message = client.health().context("detection service unreachable")?;
        log::info!("service healthy: {}", message.trim());
    }

    // Validation happens before any request is issued.
    let file = UploadFile::from_path(&args.image)?;
    let source = file.source_size()?;

    let mut session = Session::with_resize_debounce(cfg.resize_debounce);
    let generation = session.begin_upload(&file.mime)?;

    let outcome = {
        let _loader = ui.loading(&format!("Detecting objects in {}", file.name));
        client.detect(&file)
    };
    session.dispatch(SessionEvent::ResponseArrived {
        generation,
        outcome,
    });

    if let Some(err) = session.last_error() {
        anyhow::bail!("{err}");
    }

    session.dispatch(SessionEvent::ImageReady { source });
    session.apply_layout(
        DisplayRect {
            width: args.display_width,
            height: args.display_height,
        },
        Offset::default(),
    );

    if !args.filter.is_empty() {
        session.dispatch(SessionEvent::FilterChanged {
            query: args.filter.clone(),
        });
    }
    let scroll = args.select.and_then(|index| session.select(index));

    if args.json {
        print_json(&session)?;
    } else {
        print_text(&session);
        if let Some(scroll) = scroll {
            println!("(scrolled to row {})", scroll.index);
        }
    }
    Ok(())
}

fn print_text(session: &Session) {
    if let Some(summary) = session.summary() {
        println!("Summary: {}", summary.text);
        println!();
    }
    if let Some(bill) = session.bill() {
        println!("Bill Analysis - {}", bill.shop_name);
        if bill.has_items() {
            for item in &bill.items {
                println!("  - {item}");
            }
        } else {
            println!("  No line items detected.");
        }
        println!("  Total: {}", bill.total);
        println!();
    }

    if let Some(placeholder) = session.placeholder_text() {
        println!("{placeholder}");
        return;
    }

    for (row, mapped) in session.rows().iter().zip(session.overlay()) {
        let marker = if row.active { "*" } else { " " };
        let mut line = format!(
            "{marker}[{}] {} {}%",
            row.index, row.class_name, row.confidence_percent
        );
        if let Some(color) = &row.color_tag {
            line.push_str(&format!(" [{color}]"));
        }
        if let Some(plate) = &row.plate_badge {
            line.push_str(&format!(" plate={plate}"));
        }
        println!("{line}");
        println!(
            "    box: left={:.1} top={:.1} w={:.1} h={:.1}",
            mapped.rect.left, mapped.rect.top, mapped.rect.width, mapped.rect.height
        );
        if !row.description.is_empty() {
            println!("    {}", row.description);
        }
        if let Some(ocr) = &row.ocr_line {
            println!("    OCR: {ocr}");
        }
    }
}

fn print_json(session: &Session) -> Result<()> {
    let rows: Vec<serde_json::Value> = session
        .rows()
        .iter()
        .map(|row| {
            serde_json::json!({
                "index": row.index,
                "class": row.class_name,
                "confidence_percent": row.confidence_percent,
                "color": row.color_tag,
                "number_plate": row.plate_badge,
                "ocr": row.ocr_line,
                "description": row.description,
                "active": row.active,
            })
        })
        .collect();
    let boxes: Vec<serde_json::Value> = session
        .overlay()
        .iter()
        .map(|b| {
            serde_json::json!({
                "index": b.index,
                "label": b.label,
                "left": b.rect.left,
                "top": b.rect.top,
                "width": b.rect.width,
                "height": b.rect.height,
                "active": b.active,
            })
        })
        .collect();
    let out = serde_json::json!({
        "summary": session.summary().map(|s| s.text.clone()),
        "bill": session.bill().map(|b| {
            serde_json::json!({
                "shop_name": b.shop_name,
                "items": b.items,
                "total": b.total,
            })
        }),
        "rows": rows,
        "boxes": boxes,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
