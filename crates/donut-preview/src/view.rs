use donut::chart::{ArcView, Donut, LegendItem};
use serde_json::{Value, json};
use std::io::{self, Write};

fn draw_arc(out: &mut impl Write, position: usize, view: &ArcView<'_>) -> io::Result<()> {
    let arc = view.arc;
    write!(
        out,
        "  [{}] section {} {} {:>7.2}° .. {:>7.2}° ({:.2}°)",
        position,
        arc.source_index,
        arc.color,
        arc.start_angle_deg,
        arc.end_angle_deg(),
        arc.sweep_deg,
    )?;
    if let Some(label) = &arc.label {
        write!(out, "  {}", label)?;
    }
    if view.hovered {
        write!(out, "  <hovered{}>", hover_suffix(view.class))?;
    }
    writeln!(out)
}

fn draw_legend_item(out: &mut impl Write, item: &LegendItem) -> io::Result<()> {
    write!(out, "  {} {} {}", item.index, item.color, item.label)?;
    if item.hovered {
        write!(out, "  <hovered{}>", hover_suffix(item.class.as_deref()))?;
    }
    writeln!(out)
}

fn hover_suffix(class: Option<&str>) -> String {
    class.map(|c| format!(" .{}", c)).unwrap_or_default()
}

pub fn draw(out: &mut impl Write, donut: &Donut) -> io::Result<()> {
    let props = donut.props();
    writeln!(
        out,
        "donut {}  ring {} on {}  hole {}%  {}  font {}",
        donut.css_size(),
        props.foreground,
        props.background,
        donut.overlay_size_percent(),
        donut.rotation(),
        donut.font_size(),
    )?;
    if let Some(text) = donut.center_text() {
        writeln!(out, "center: {}", text)?;
    }

    writeln!(out, "arcs:")?;
    for (position, view) in donut.arc_views().iter().enumerate() {
        draw_arc(out, position, view)?;
    }

    if let Some(items) = donut.legend() {
        writeln!(out, "legend ({}):", props.legend_placement)?;
        for item in &items {
            draw_legend_item(out, item)?;
        }
    }
    Ok(())
}

pub fn snapshot(donut: &Donut) -> Value {
    let props = donut.props();
    let arcs: Vec<Value> = donut
        .arc_views()
        .iter()
        .map(|view| {
            json!({
                "arc": view.arc,
                "hovered": view.hovered,
                "class": view.class,
            })
        })
        .collect();

    json!({
        "size": donut.css_size(),
        "thickness": props.thickness,
        "overlay_size_percent": donut.overlay_size_percent(),
        "background": props.background,
        "foreground": props.foreground,
        "transform": donut.rotation(),
        "font_size": donut.font_size(),
        "text": donut.center_text(),
        "arcs": arcs,
        "legend": donut.legend().map(|items| json!({
            "placement": props.legend_placement,
            "items": items,
        })),
    })
}
