//! HTML rendering of the form page.

use std::fmt::Write;

use crate::assessment::Assessment;
use crate::charts::{RadarChart, FEATURE_IMPORTANCE, PLACEMENT_TIPS};
use crate::insights::Bullet;
use crate::models::inference::PredictionError;
use crate::types::profile::{ProfileError, ProfileForm, StudentProfile};

const STYLE: &str = include_str!("../../static/style.css");

/// What to show below the form
pub enum Outcome<'a> {
    /// Page opened, nothing submitted yet
    Empty,
    /// Submission rejected by validation
    Invalid(&'a ProfileError),
    /// Classifier raised an error
    Failed(&'a PredictionError),
    /// Successful submission
    Assessed(&'a Assessment),
}

/// Render the whole page. `radar` is the chart for the inputs currently in
/// the form, when they are valid.
pub fn render_page(form: &ProfileForm, radar: Option<&RadarChart>, outcome: &Outcome<'_>) -> String {
    let mut out = String::with_capacity(16 * 1024);

    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html lang=\"en\">");
    let _ = writeln!(out, "<head>");
    let _ = writeln!(out, "<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>🎓 Student Placement Predictor</title>");
    let _ = writeln!(
        out,
        "<script src=\"https://cdn.plot.ly/plotly-2.35.2.min.js\" charset=\"utf-8\"></script>"
    );
    let _ = writeln!(out, "<style>{}</style>", STYLE);
    let _ = writeln!(out, "</head>");
    let _ = writeln!(out, "<body>");
    let _ = writeln!(
        out,
        "<div class=\"main-title\">🎓 AI-Powered Student Placement Predictor</div>"
    );
    let _ = writeln!(
        out,
        "<div class=\"sub-title\">Machine learning model to predict student placement probability with detailed insights</div>"
    );
    let _ = writeln!(out, "<div class=\"layout\">");

    render_sidebar(&mut out);

    let _ = writeln!(out, "<main>");
    let _ = writeln!(out, "<div class=\"columns\">");
    render_form(&mut out, form);
    render_summary(&mut out, radar);
    let _ = writeln!(out, "</div>");

    match outcome {
        Outcome::Empty => {}
        Outcome::Invalid(e) => render_error(&mut out, &e.to_string()),
        Outcome::Failed(e) => render_error(&mut out, &e.to_string()),
        Outcome::Assessed(assessment) => render_assessment(&mut out, assessment),
    }

    let _ = writeln!(out, "</main>");
    let _ = writeln!(out, "</div>");
    let _ = writeln!(
        out,
        "<footer><p>🎓 Student Placement Predictor • Built with Rust &amp; Machine Learning</p><p>⚡ Powered by Random Forest Algorithm • Last Updated: {}</p></footer>",
        chrono::Local::now().format("%B %Y")
    );
    let _ = writeln!(out, "</body>");
    let _ = writeln!(out, "</html>");

    out
}

fn render_sidebar(out: &mut String) {
    let _ = writeln!(out, "<aside>");
    let _ = writeln!(out, "<h2>📊 About This Tool</h2>");
    let _ = writeln!(
        out,
        "<div class=\"info-box\"><strong>🤖 Model Information:</strong><br>• Random Forest Algorithm<br>• 6 Key Features Analysis<br>• Real-time Processing</div>"
    );
    let _ = writeln!(out, "<h3>📈 Feature Importance</h3>");
    let _ = writeln!(out, "<dl class=\"importance\">");
    for (feature, importance) in FEATURE_IMPORTANCE.iter() {
        let _ = writeln!(
            out,
            "<dt>{}</dt><dd>{:.1}%</dd>",
            feature,
            importance * 100.0
        );
    }
    let _ = writeln!(out, "</dl>");
    let _ = writeln!(out, "<h3>🎯 Tips for Better Placement</h3>");
    let _ = writeln!(out, "<ul>");
    for tip in PLACEMENT_TIPS.iter() {
        let _ = writeln!(out, "<li>{}</li>", tip);
    }
    let _ = writeln!(out, "</ul>");
    let _ = writeln!(out, "</aside>");
}

fn render_form(out: &mut String, form: &ProfileForm) {
    let defaults = ProfileForm::from(&StudentProfile::default());
    let value = |submitted: &Option<String>, default: &Option<String>| {
        escape(submitted.as_deref().or(default.as_deref()).unwrap_or(""))
    };

    let _ = writeln!(out, "<section class=\"input-section\">");
    let _ = writeln!(out, "<h3>📝 Student Profile Input</h3>");
    let _ = writeln!(out, "<form method=\"post\" action=\"/\">");
    let _ = writeln!(out, "<h4>🎓 Academic Metrics</h4>");
    number_input(
        out,
        "iq",
        "🧠 IQ Score",
        &value(&form.iq, &defaults.iq),
        "50",
        "200",
        "1",
        "General intelligence quotient (50-200)",
    );
    number_input(
        out,
        "academic_performance",
        "📚 Academic Performance",
        &value(&form.academic_performance, &defaults.academic_performance),
        "0",
        "10",
        "1",
        "Overall academic performance (0-10)",
    );
    number_input(
        out,
        "prev_sem_result",
        "📊 Previous Semester Result",
        &value(&form.prev_sem_result, &defaults.prev_sem_result),
        "0",
        "10",
        "0.1",
        "Previous semester GPA/percentage (0-10)",
    );
    number_input(
        out,
        "communication_skills",
        "🗣️ Communication Skills",
        &value(&form.communication_skills, &defaults.communication_skills),
        "0",
        "10",
        "1",
        "Verbal and written communication ability (0-10)",
    );

    let _ = writeln!(out, "<h4>💼 Experience &amp; Skills</h4>");
    let internship = form
        .internship_experience
        .as_deref()
        .and_then(|raw| crate::types::profile::parse_toggle(raw).ok())
        .unwrap_or(false);
    let _ = writeln!(
        out,
        "<label for=\"internship_experience\" title=\"Has completed at least one internship\">💼 Internship Experience</label>"
    );
    let _ = writeln!(
        out,
        "<select id=\"internship_experience\" name=\"internship_experience\"><option value=\"No\"{}>No</option><option value=\"Yes\"{}>Yes</option></select>",
        if internship { "" } else { " selected" },
        if internship { " selected" } else { "" }
    );
    number_input(
        out,
        "projects_completed",
        "📁 Projects Completed",
        &value(&form.projects_completed, &defaults.projects_completed),
        "0",
        "20",
        "1",
        "Number of significant projects completed",
    );

    let _ = writeln!(
        out,
        "<button type=\"submit\">🔍 Predict Placement Probability</button>"
    );
    let _ = writeln!(out, "</form>");
    let _ = writeln!(out, "</section>");
}

#[allow(clippy::too_many_arguments)]
fn number_input(
    out: &mut String,
    name: &str,
    label: &str,
    value: &str,
    min: &str,
    max: &str,
    step: &str,
    help: &str,
) {
    let _ = writeln!(
        out,
        "<label for=\"{name}\" title=\"{help}\">{label}</label><input type=\"number\" id=\"{name}\" name=\"{name}\" value=\"{value}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" required>"
    );
}

fn render_summary(out: &mut String, radar: Option<&RadarChart>) {
    let _ = writeln!(out, "<section class=\"summary\">");
    let _ = writeln!(out, "<h3>📊 Input Summary</h3>");
    if let Some(radar) = radar {
        let _ = writeln!(out, "<div id=\"radar-chart\" class=\"chart\"></div>");
        let _ = writeln!(
            out,
            "<script>const radar = {};\nPlotly.newPlot('radar-chart', [{{type: 'scatterpolar', r: radar.values, theta: radar.categories, fill: 'toself', name: 'Current Profile', line: {{color: '#2E8B57'}}}}], {{polar: {{radialaxis: {{visible: true, range: radar.range}}}}, showlegend: false, height: 300, margin: {{l: 0, r: 0, t: 0, b: 0}}}});</script>",
            script_json(radar)
        );
    }
    let _ = writeln!(out, "</section>");
}

fn render_error(out: &mut String, message: &str) {
    let _ = writeln!(out, "<div class=\"error\">{}</div>", escape(message));
}

fn render_assessment(out: &mut String, assessment: &Assessment) {
    let prediction = &assessment.prediction;
    let (class, icon) = if prediction.label {
        ("result-success", "✅")
    } else {
        ("result-warning", "⚠️")
    };

    let _ = writeln!(out, "<hr>");
    let _ = writeln!(
        out,
        "<div class=\"{}\"><h2>{} Placement Prediction: {}</h2><h3>Probability: {:.1}%</h3><p>{}</p></div>",
        class,
        icon,
        prediction.headline(),
        prediction.probability_percent,
        prediction.summary()
    );

    let _ = writeln!(out, "<div class=\"columns\">");
    let _ = writeln!(out, "<section>");
    let _ = writeln!(out, "<h3>📈 Detailed Analysis</h3>");
    bullet_list(out, "🎯 Key Strengths:", &assessment.insights.strengths);
    bullet_list(out, "🔧 Areas for Improvement:", &assessment.insights.weaknesses);
    let _ = writeln!(out, "</section>");

    let _ = writeln!(out, "<section>");
    let _ = writeln!(out, "<h3>🎯 Recommendations</h3>");
    let _ = writeln!(out, "<ol class=\"recommendations\">");
    for recommendation in &assessment.insights.recommendations {
        let _ = writeln!(out, "<li>{}</li>", recommendation);
    }
    let _ = writeln!(out, "</ol>");
    let _ = writeln!(out, "</section>");
    let _ = writeln!(out, "</div>");

    let _ = writeln!(out, "<h3>📊 Feature Contribution Analysis</h3>");
    let _ = writeln!(out, "<div id=\"bar-chart\" class=\"chart\"></div>");
    let _ = writeln!(
        out,
        "<script>const bars = {};\nPlotly.newPlot('bar-chart', [{{type: 'bar', x: bars.features, y: bars.values, marker: {{color: bars.values, colorscale: 'Viridis'}}}}], {{title: bars.title, xaxis: {{title: 'Features'}}, yaxis: {{title: 'Score (Normalized)'}}, showlegend: false, height: 400}});</script>",
        script_json(&assessment.feature_bars)
    );
}

fn bullet_list(out: &mut String, heading: &str, bullets: &[Bullet]) {
    if bullets.is_empty() {
        return;
    }
    let _ = writeln!(out, "<p><strong>{}</strong></p>", heading);
    let _ = writeln!(out, "<ul class=\"bullets\">");
    for bullet in bullets {
        let _ = writeln!(
            out,
            "<li>{} {}</li>",
            bullet.attribute.icon(),
            bullet.text
        );
    }
    let _ = writeln!(out, "</ul>");
}

/// JSON for embedding in a `<script>` element
fn script_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

/// Minimal HTML escaping for text and attribute values
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::assess;
    use crate::feature_extractor::FeatureRecord;
    use crate::models::{Classifier, Predictor};

    struct AlwaysPlaced;

    impl Classifier for AlwaysPlaced {
        fn name(&self) -> &str {
            "always-placed"
        }

        fn predict(&self, _record: &FeatureRecord) -> anyhow::Result<bool> {
            Ok(true)
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<script>\"a\" & 'b'</script>"),
            "&lt;script&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_empty_page_shows_defaults() {
        let page = render_page(&ProfileForm::default(), None, &Outcome::Empty);
        assert!(page.contains("name=\"iq\" value=\"100\""));
        assert!(page.contains("name=\"prev_sem_result\" value=\"7.0\""));
        assert!(page.contains("<option value=\"No\" selected>"));
        assert!(page.contains("Academic Performance</dt><dd>25.0%"));
        assert!(!page.contains("Placement Prediction:"));
    }

    #[test]
    fn test_submitted_values_are_escaped() {
        let form = ProfileForm {
            iq: Some("\"><b>".to_string()),
            ..Default::default()
        };
        let error = form.parse().unwrap_err();
        let page = render_page(&form, None, &Outcome::Invalid(&error));
        assert!(page.contains("value=\"&quot;&gt;&lt;b&gt;\""));
        assert!(!page.contains("\"><b>"));
        assert!(page.contains("class=\"error\""));
    }

    #[test]
    fn test_assessment_sections() {
        let predictor = Predictor::from_classifier(Box::new(AlwaysPlaced));
        let profile = StudentProfile::new(70, 3, 3.0, 3, false, 0).unwrap();
        let assessment = assess(&predictor, &profile).unwrap();

        let form = ProfileForm::from(&profile);
        let radar = crate::charts::radar(&profile);
        let page = render_page(&form, Some(&radar), &Outcome::Assessed(&assessment));

        assert!(page.contains("LIKELY TO BE PLACED"));
        assert!(page.contains("Probability: 85.0%"));
        assert!(page.contains("Areas for Improvement"));
        assert!(!page.contains("Key Strengths"));
        assert!(page.contains("<li>Focus on improving academic grades</li>"));
        assert!(page.contains("Plotly.newPlot('radar-chart'"));
        assert!(page.contains("Plotly.newPlot('bar-chart'"));
    }
}
