//! Template engine setup and HTML templates.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tera::{Context, Tera, Value};

use crate::links;

/// Global template engine instance with embedded templates.
pub static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();

    tera.add_raw_templates(vec![
        ("base.html", BASE_TEMPLATE),
        ("themes.html", THEMES_TEMPLATE),
        ("theme_card.html", THEME_CARD_TEMPLATE),
        ("submit.html", SUBMIT_TEMPLATE),
        ("edit.html", EDIT_TEMPLATE),
        ("export.html", EXPORT_TEMPLATE),
        ("recording.html", RECORDING_TEMPLATE),
        ("error.html", ERROR_TEMPLATE),
    ])
    .expect("Failed to load templates");
    tera.register_filter("encode_description", encode_description_filter);

    tera
});

/// Render a template with context
pub fn render(template: &str, context: &Context) -> Result<String, tera::Error> {
    TEMPLATES.render(template, context)
}

/// `{{ text | encode_description | safe }}`
fn encode_description_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = tera::try_get_value!("encode_description", "value", String, value);
    Ok(Value::String(links::encode_description(&text)))
}

// =============================================================================
// Embedded Templates
// =============================================================================

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}Themes{% endblock %}</title>
    <style>
        :root {
            --bg: #fbfaf7;
            --panel: #ffffff;
            --text: #1d1d1b;
            --muted: #6b6a66;
            --line: #e4e1da;
            --accent: #2f5d8a;
            --current: #c2410c;
        }
        * { box-sizing: border-box; }
        body {
            margin: 0;
            font-family: Georgia, "Times New Roman", serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.5;
        }
        a { color: var(--accent); }
        header {
            border-bottom: 1px solid var(--line);
            padding: 14px 28px;
            display: flex;
            gap: 24px;
            align-items: baseline;
        }
        header .brand { font-weight: bold; font-size: 18px; color: var(--text); text-decoration: none; }
        header nav a { margin-right: 16px; color: var(--muted); text-decoration: none; }
        header nav a.active { color: var(--text); border-bottom: 2px solid var(--accent); }
        main { max-width: 900px; margin: 0 auto; padding: 28px; }
        h1 { font-size: 26px; margin: 0 0 20px; }
        h2 { font-size: 16px; text-transform: uppercase; letter-spacing: 0.06em; color: var(--muted); margin: 32px 0 10px; }
        .theme {
            background: var(--panel);
            border: 1px solid var(--line);
            border-radius: 6px;
            padding: 14px 16px;
            margin-bottom: 10px;
        }
        .theme.current { border-left: 4px solid var(--current); }
        .theme .meta { font-size: 13px; color: var(--muted); margin-top: 8px; }
        .theme .meta a { margin-right: 10px; }
        .priority { font-family: monospace; font-size: 13px; margin-right: 10px; }
        .empty { color: var(--muted); font-style: italic; }
        textarea { width: 100%; min-height: 220px; font: 14px/1.4 monospace; padding: 10px; }
        .btn {
            display: inline-block;
            margin-top: 10px;
            padding: 6px 16px;
            border: 1px solid var(--accent);
            border-radius: 4px;
            background: var(--accent);
            color: #fff;
            cursor: pointer;
        }
        form.inline { display: inline; }
        ul.links li { margin-bottom: 4px; word-break: break-all; }
    </style>
</head>
<body>
    <header>
        <a href="/themes" class="brand">Themes</a>
        <nav>
            <a href="/themes" {% if section == "themes" %}class="active"{% endif %}>List</a>
            <a href="/submit" {% if section == "submit" %}class="active"{% endif %}>Submit</a>
            <a href="/recording" {% if section == "recording" %}class="active"{% endif %}>Recording</a>
        </nav>
    </header>
    <main>
        {% block content %}{% endblock %}
    </main>
</body>
</html>"##;

const THEMES_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}
<h2>Current</h2>
{% if current %}
{% for theme in current %}{% include "theme_card.html" %}{% endfor %}
{% else %}
<p class="empty">Nothing is being discussed right now.</p>
{% endif %}

<h2>Queue</h2>
{% if regular %}
{% for theme in regular %}{% include "theme_card.html" %}{% endfor %}
{% else %}
<p class="empty">The queue is empty. <a href="/submit">Submit a theme</a>.</p>
{% endif %}

<h2>Discussed</h2>
{% if discussed %}
{% for theme in discussed %}{% include "theme_card.html" %}{% endfor %}
<form method="get" action="/themes/discussed/export" class="inline">
    <button type="submit" class="btn">Export links</button>
</form>
<form method="post" action="/themes/discussed/clear" class="inline">
    <label><input type="checkbox" name="sure" value="y"> Sure</label>
    <button type="submit" class="btn">Clear discussed</button>
</form>
{% else %}
<p class="empty">No discussed themes.</p>
{% endif %}
{% endblock %}"##;

/// One theme in a list; priority controls only apply to queued themes.
const THEME_CARD_TEMPLATE: &str = r##"<div class="theme {{ theme.status }}">
    <div>{{ theme.description | encode_description | safe }}</div>
    <div class="meta">
        {% if theme.status == "regular" %}
        <span class="priority">[{{ theme.priority }}]</span>
        {% if theme.can_raise %}<a href="/themes/{{ theme.id }}/priority/up">up</a>{% endif %}
        {% if theme.can_lower %}<a href="/themes/{{ theme.id }}/priority/down">down</a>{% endif %}
        {% endif %}
        #{{ theme.id }} by {{ theme.creator }}, rev {{ theme.rev }}
        <a href="/themes/{{ theme.id }}/edit">edit</a>
        {% for target in theme.transitions %}
        <a href="/themes/{{ theme.id }}/mark/{{ target }}">mark {{ target }}</a>
        {% endfor %}
    </div>
</div>
"##;

const SUBMIT_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Submit - Themes{% endblock %}
{% block content %}
<h1>Submit a theme</h1>
<form method="post" action="/submit">
    <label for="description">Description</label>
    <textarea id="description" name="description">{{ form.description }}</textarea>
    <button type="submit" class="btn">Submit</button>
</form>
{% endblock %}"##;

const EDIT_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Edit #{{ theme_id }} - Themes{% endblock %}
{% block content %}
<h1>Edit theme #{{ theme_id }}</h1>
<form method="post" action="/themes/{{ theme_id }}/edit">
    <label for="description">Description</label>
    <textarea id="description" name="description">{{ form.description }}</textarea>
    <button type="submit" class="btn">Save</button>
</form>
{% endblock %}"##;

const EXPORT_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Links - Themes{% endblock %}
{% block content %}
<h1>Links from discussed themes</h1>
{% if urls %}
<ul class="links">
    {% for url in urls %}
    <li><a href="{{ url }}">{{ url }}</a></li>
    {% endfor %}
</ul>
{% else %}
<p class="empty">No links found.</p>
{% endif %}
{% endblock %}"##;

const RECORDING_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Recording - Themes{% endblock %}
{% block content %}
<h1>Recording</h1>
<p>Before recording, pick themes from the queue with <em>mark current</em>.
They show up under <em>Current</em> on the list page.</p>
<p>When a theme is done, mark it <em>discussed</em>. After the episode, use
<em>Export links</em> to collect every link mentioned in discussed themes for
the show notes, then clear the discussed list.</p>
{% endblock %}"##;

const ERROR_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Error - Themes{% endblock %}
{% block content %}
<h1>Something went wrong</h1>
<p>{{ message }}</p>
<p><a href="/themes">Back to themes</a></p>
{% endblock %}"##;
