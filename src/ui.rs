use crate::errors::KpiError;
use crate::models::{
    DashboardParams, Dataset, DerivedView, NpsBreakdown, SATISFACTION_SLIDER_MAX, SATISFACTION_SLIDER_MIN,
    SATISFACTION_SLIDER_STEP,
};

pub fn render_index(
    dataset: &Dataset,
    locations: &[String],
    nps: &[NpsBreakdown],
    params: &DashboardParams,
    initial: &Result<DerivedView, KpiError>,
) -> Result<String, serde_json::Error> {
    let bootstrap = match initial {
        Ok(view) => serde_json::json!({ "nps": nps, "view": view, "error": null }),
        Err(err) => serde_json::json!({ "nps": nps, "view": null, "error": err.to_string() }),
    };
    let bootstrap = serde_json::to_string(&bootstrap)?.replace("</", "<\\/");

    let options: String = locations
        .iter()
        .map(|location| {
            let selected = if location == params.location.as_str() { " selected" } else { "" };
            let escaped = escape_html(location);
            format!("<option value=\"{escaped}\"{selected}>{escaped}</option>")
        })
        .collect();

    Ok(INDEX_HTML
        .replace("{{SOURCE}}", &escape_html(&dataset.source.display().to_string()))
        .replace("{{LOADED_AT}}", &escape_html(&dataset.loaded_at))
        .replace("{{OPTIONS}}", &options)
        .replace("{{MIN}}", &SATISFACTION_SLIDER_MIN.to_string())
        .replace("{{MAX}}", &SATISFACTION_SLIDER_MAX.to_string())
        .replace("{{STEP}}", &SATISFACTION_SLIDER_STEP.to_string())
        .replace("{{VALUE}}", &format!("{:.1}", params.min_satisfaction))
        .replace("{{CHECKED}}", if params.show_table { "checked" } else { "" })
        .replace("{{BOOTSTRAP}}", &bootstrap))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Fitness KPI Dashboard</title>
  <style>
    :root {
      --ink: #2b2a28;
      --muted: #5f5c57;
      --card: #ffffff;
      --line: #e4ded4;
    }

    body {
      margin: 0;
      background: #f8f3e6;
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      grid-template-columns: 260px 1fr;
      min-height: 100vh;
    }

    aside, main {
      padding: 24px;
    }

    aside {
      background: var(--card);
      border-right: 1px solid var(--line);
      display: grid;
      gap: 18px;
      align-content: start;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.9rem;
    }

    .metrics {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 12px;
    }

    .metric {
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 12px;
      padding: 14px;
    }

    .metric span {
      display: block;
      color: var(--muted);
      font-size: 0.8rem;
    }

    .metric strong {
      font-size: 1.6rem;
    }

    table {
      border-collapse: collapse;
      width: 100%;
      background: var(--card);
      margin-bottom: 24px;
    }

    th, td {
      border: 1px solid var(--line);
      padding: 6px 10px;
      text-align: left;
    }

    .status {
      min-height: 1.2em;
      color: #b3261e;
    }

    footer {
      color: var(--muted);
      font-size: 0.8rem;
    }
  </style>
</head>
<body>
  <aside>
    <label>Select Location
      <select id="location">{{OPTIONS}}</select>
    </label>
    <label>Minimum Satisfaction Score: <output id="threshold-value">{{VALUE}}</output>
      <input id="threshold" type="range" min="{{MIN}}" max="{{MAX}}" step="{{STEP}}" value="{{VALUE}}" />
    </label>
    <label>
      <span><input id="show-table" type="checkbox" {{CHECKED}} /> Show Detailed Equipment Table</span>
    </label>
  </aside>
  <main>
    <h1>Customer Satisfaction &amp; Operational Efficiency</h1>
    <p class="status" id="status"></p>

    <section class="metrics">
      <div class="metric"><span>Locations shown</span><strong id="m-count">-</strong></div>
      <div class="metric"><span>Avg satisfaction</span><strong id="m-sat">-</strong></div>
      <div class="metric"><span>Avg NPS</span><strong id="m-nps">-</strong></div>
      <div class="metric"><span>Avg churn (%)</span><strong id="m-churn">-</strong></div>
      <div class="metric"><span>Avg downtime (hrs/month)</span><strong id="m-downtime">-</strong></div>
    </section>

    <h2>Net Promoter Score (NPS) by Location</h2>
    <table>
      <thead><tr><th>Location</th><th>Promoters</th><th>Passives</th><th>Detractors</th></tr></thead>
      <tbody id="nps-body"></tbody>
    </table>

    <section id="downtime-section">
      <h2>Equipment Downtime (hrs/month)</h2>
      <table>
        <thead><tr><th>Location</th><th>Downtime</th><th>Severity</th></tr></thead>
        <tbody id="downtime-body"></tbody>
      </table>
    </section>

    <footer>Data: {{SOURCE}} (loaded {{LOADED_AT}})</footer>
  </main>

  <script id="bootstrap" type="application/json">{{BOOTSTRAP}}</script>
  <script>
    const locationInput = document.getElementById('location');
    const thresholdInput = document.getElementById('threshold');
    const thresholdValue = document.getElementById('threshold-value');
    const tableToggle = document.getElementById('show-table');
    const statusEl = document.getElementById('status');

    const cell = (text, color) => {
      const td = document.createElement('td');
      td.textContent = text;
      if (color) {
        td.style.backgroundColor = color;
      }
      return td;
    };

    const fillRows = (tbody, rows) => {
      tbody.replaceChildren(...rows.map((cells) => {
        const tr = document.createElement('tr');
        tr.append(...cells);
        return tr;
      }));
    };

    const clearView = () => {
      ['m-count', 'm-sat', 'm-nps', 'm-churn', 'm-downtime'].forEach((id) => {
        document.getElementById(id).textContent = '-';
      });
      fillRows(document.getElementById('downtime-body'), []);
    };

    const renderNps = (rows) => {
      fillRows(document.getElementById('nps-body'), rows.map((row) => [
        cell(row.location), cell(row.promoters), cell(row.passives), cell(row.detractors)
      ]));
    };

    const render = (view) => {
      const s = view.summary;
      document.getElementById('m-count').textContent = s.row_count;
      document.getElementById('m-sat').textContent = s.mean_satisfaction.toFixed(2);
      document.getElementById('m-nps').textContent = s.mean_nps.toFixed(1);
      document.getElementById('m-churn').textContent = s.mean_churn_pct.toFixed(2);
      document.getElementById('m-downtime').textContent = s.mean_downtime_hrs.toFixed(2);

      renderNps(view.nps_by_location);

      const section = document.getElementById('downtime-section');
      section.hidden = !view.downtime_table;
      fillRows(document.getElementById('downtime-body'), (view.downtime_table || []).map((row) => [
        cell(row.location), cell(row.formatted, row.color), cell(row.severity)
      ]));
    };

    const refresh = async () => {
      thresholdValue.textContent = Number(thresholdInput.value).toFixed(1);
      const query = new URLSearchParams({
        location: locationInput.value,
        min_satisfaction: thresholdInput.value,
        show_table: tableToggle.checked
      });
      const res = await fetch(`/api/view?${query}`);
      if (!res.ok) {
        clearView();
        statusEl.textContent = await res.text();
        return;
      }
      statusEl.textContent = '';
      render(await res.json());
    };

    [locationInput, thresholdInput, tableToggle].forEach((input) => {
      input.addEventListener('change', () => {
        refresh().catch((err) => { statusEl.textContent = err.message; });
      });
    });

    const bootstrap = JSON.parse(document.getElementById('bootstrap').textContent);
    renderNps(bootstrap.nps);
    if (bootstrap.view) {
      render(bootstrap.view);
    } else {
      statusEl.textContent = bootstrap.error;
    }
  </script>
</body>
</html>
"#;
