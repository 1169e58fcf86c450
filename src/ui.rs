use crate::models::ViewKind;

pub struct Captions {
    pub header: &'static str,
    pub section: Option<&'static str>,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
}

pub fn captions(view: ViewKind) -> Captions {
    match view {
        ViewKind::Today => Captions {
            header: "Today's Mood Trends",
            section: None,
            title: "Mood Frequency for Today",
            x_label: "Mood",
            y_label: "Count",
        },
        ViewKind::Overall => Captions {
            header: "Filtered Mood Data",
            section: Some("Overall Mood Counts"),
            title: "Overall Mood Frequency",
            x_label: "Mood",
            y_label: "Count",
        },
        ViewKind::ByDay => Captions {
            header: "Filtered Mood Data",
            section: Some("Grouped Mood Counts by Day"),
            title: "Mood Frequency by Day",
            x_label: "Date",
            y_label: "Count",
        },
    }
}

pub fn render_index(choices: &[&str], refresh_secs: u64) -> String {
    let options = choices
        .iter()
        .enumerate()
        .map(|(i, mood)| {
            let escaped = escape_html(mood);
            let selected = if i == 0 { " selected" } else { "" };
            format!(r#"<option value="{escaped}"{selected}>{escaped}</option>"#)
        })
        .collect::<Vec<_>>()
        .join("\n          ");

    INDEX_HTML
        .replace("{{MOOD_OPTIONS}}", &options)
        .replace("{{REFRESH_MS}}", &(refresh_secs.saturating_mul(1000)).to_string())
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Mood of the Queue</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --muted: #5f5c57;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --bar: #87ceeb;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      grid-template-columns: minmax(220px, 260px) minmax(0, 1fr);
      gap: 24px;
      padding: 32px 18px 48px;
    }

    @media (max-width: 760px) {
      body {
        grid-template-columns: 1fr;
      }
    }

    aside,
    main {
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 28px;
    }

    aside {
      align-self: start;
      display: grid;
      gap: 14px;
    }

    main {
      display: grid;
      gap: 24px;
      max-width: 900px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    h2,
    h3 {
      margin: 0;
    }

    .subtitle {
      margin: 6px 0 0;
      color: var(--muted);
    }

    form.entry {
      display: grid;
      grid-template-columns: auto 1fr auto;
      gap: 12px;
      align-items: end;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: #8b857d;
    }

    select,
    input[type="text"] {
      font: inherit;
      font-size: 1.1rem;
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      background: white;
    }

    button {
      font: inherit;
      font-weight: 600;
      border: none;
      border-radius: 14px;
      padding: 12px 20px;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    .filters label {
      display: flex;
      align-items: center;
      gap: 8px;
      font-size: 1.1rem;
      text-transform: none;
      letter-spacing: 0;
      color: var(--ink);
    }

    .status {
      min-height: 1.4em;
      font-weight: 500;
    }

    .status.ok {
      color: #2e7d32;
    }

    .status.error {
      color: #c62828;
    }

    .status.info {
      color: var(--accent-2);
    }

    svg {
      width: 100%;
      height: auto;
    }

    .chart-grid {
      stroke: rgba(47, 72, 88, 0.12);
    }

    .chart-label {
      font-size: 12px;
      fill: var(--muted);
    }

    .legend {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      font-size: 0.95rem;
    }

    .legend span::before {
      content: "";
      display: inline-block;
      width: 12px;
      height: 12px;
      margin-right: 6px;
      border-radius: 3px;
      background: var(--swatch);
    }
  </style>
</head>
<body>
  <aside>
    <h3>Filter Options</h3>
    <div>Select Moods</div>
    <div class="filters" id="mood-filters"></div>
    <label class="filters"><input type="checkbox" id="group-by-day" /> Group by Day</label>
  </aside>

  <main>
    <header>
      <h1>Mood of the Queue</h1>
      <p class="subtitle">Record the current vibe of the support ticket queue.</p>
    </header>

    <form class="entry" id="entry-form" method="post" action="/mood">
      <label>
        Mood
        <select name="mood" id="mood">
          {{MOOD_OPTIONS}}
        </select>
      </label>
      <label>
        Add a short note (optional)
        <input type="text" name="note" id="note" placeholder="e.g. lots of Rx delays today" />
      </label>
      <button type="submit">Submit Entry</button>
    </form>
    <div class="status" id="status" role="status"></div>

    <section>
      <h2 id="view-header"></h2>
      <h3 id="view-section"></h3>
      <p class="subtitle" id="chart-title"></p>
      <div class="legend" id="legend"></div>
      <svg id="chart" viewBox="0 0 640 300" role="img"></svg>
    </section>
  </main>

  <script>
    const REFRESH_MS = {{REFRESH_MS}};
    const SVG_NS = 'http://www.w3.org/2000/svg';
    const PALETTE = ['#87ceeb', '#ff6b4a', '#2f4858', '#f2a541', '#6a994e', '#9b5de5'];

    const statusEl = document.getElementById('status');
    const filtersEl = document.getElementById('mood-filters');
    const groupEl = document.getElementById('group-by-day');
    const chartEl = document.getElementById('chart');
    const legendEl = document.getElementById('legend');

    const setStatus = (message, tone) => {
      statusEl.textContent = message;
      statusEl.className = `status ${tone || ''}`;
    };

    const svg = (name, attrs, text) => {
      const el = document.createElementNS(SVG_NS, name);
      Object.entries(attrs).forEach(([key, value]) => el.setAttribute(key, value));
      if (text !== undefined) {
        el.textContent = text;
      }
      return el;
    };

    const selectedMoods = () =>
      Array.from(filtersEl.querySelectorAll('input:checked')).map((input) => input.value);

    const renderFilters = (moods) => {
      const checked = new Set(selectedMoods());
      filtersEl.replaceChildren();
      moods.forEach((mood) => {
        const label = document.createElement('label');
        const input = document.createElement('input');
        input.type = 'checkbox';
        input.value = mood;
        input.checked = checked.has(mood);
        input.addEventListener('change', refresh);
        label.append(input, document.createTextNode(mood));
        filtersEl.append(label);
      });
    };

    const renderLegend = (table) => {
      legendEl.replaceChildren();
      if (table.view !== 'by_day') {
        return;
      }
      table.columns.forEach((column, index) => {
        const item = document.createElement('span');
        item.style.setProperty('--swatch', PALETTE[index % PALETTE.length]);
        item.textContent = column;
        legendEl.append(item);
      });
    };

    const renderChart = (data) => {
      const table = data.table;
      chartEl.replaceChildren();
      renderLegend(table);

      if (!table.rows.length) {
        const message = data.available_moods.length
          ? 'No entries to show for this selection.'
          : 'No mood data available yet.';
        chartEl.append(svg('text', { class: 'chart-label', x: '50%', y: '50%', 'text-anchor': 'middle' }, message));
        return;
      }

      const width = 640;
      const height = 300;
      const left = 48;
      const right = 16;
      const top = 16;
      const bottom = 56;
      const plotW = width - left - right;
      const plotH = height - top - bottom;

      const max = Math.max(1, ...table.rows.flatMap((row) => row.counts));
      const groupW = plotW / table.rows.length;
      const series = Math.max(1, table.columns.length);
      const barW = Math.max(4, (groupW * 0.7) / series);
      const y = (value) => top + plotH - (value / max) * plotH;

      const ticks = Math.min(max, 5);
      for (let i = 0; i <= ticks; i += 1) {
        const value = Math.round((max * i) / ticks);
        chartEl.append(svg('line', { class: 'chart-grid', x1: left, x2: width - right, y1: y(value), y2: y(value) }));
        chartEl.append(svg('text', { class: 'chart-label', x: left - 8, y: y(value) + 4, 'text-anchor': 'end' }, String(value)));
      }

      table.rows.forEach((row, rowIndex) => {
        const groupX = left + rowIndex * groupW + (groupW - barW * series) / 2;
        row.counts.forEach((count, colIndex) => {
          const color = table.view === 'by_day' ? PALETTE[colIndex % PALETTE.length] : PALETTE[0];
          const rect = svg('rect', {
            x: groupX + colIndex * barW,
            y: y(count),
            width: barW - 2,
            height: top + plotH - y(count),
            rx: 3,
            fill: color
          });
          rect.append(svg('title', {}, `${row.label} ${table.columns[colIndex]}: ${count}`));
          chartEl.append(rect);
        });
        chartEl.append(svg('text', {
          class: 'chart-label',
          x: left + rowIndex * groupW + groupW / 2,
          y: height - bottom + 18,
          'text-anchor': 'middle'
        }, row.label));
      });

      chartEl.append(svg('text', { class: 'chart-label', x: left + plotW / 2, y: height - 12, 'text-anchor': 'middle' }, data.x_label));
      chartEl.append(svg('text', {
        class: 'chart-label',
        x: 14,
        y: top + plotH / 2,
        'text-anchor': 'middle',
        transform: `rotate(-90 14 ${top + plotH / 2})`
      }, data.y_label));
    };

    const refresh = async () => {
      const params = new URLSearchParams();
      const moods = selectedMoods();
      if (moods.length) {
        params.set('moods', moods.join(','));
      }
      params.set('group_by_day', String(groupEl.checked));

      try {
        const res = await fetch(`/api/counts?${params}`);
        if (!res.ok) {
          throw new Error('Unable to load mood data');
        }
        const data = await res.json();
        document.getElementById('view-header').textContent = data.header;
        document.getElementById('view-section').textContent = data.section || '';
        document.getElementById('chart-title').textContent = data.title;
        renderFilters(data.available_moods);
        renderChart(data);
        if (data.error) {
          setStatus(data.error, 'error');
        }
      } catch (err) {
        setStatus(err.message, 'error');
      }
    };

    document.getElementById('entry-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      setStatus('Saving...', 'info');
      const res = await fetch('/api/moods', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({
          mood: document.getElementById('mood').value,
          note: document.getElementById('note').value
        })
      });
      if (!res.ok) {
        setStatus((await res.text()) || 'Request failed', 'error');
        return;
      }
      document.getElementById('note').value = '';
      setStatus('Mood entry submitted!', 'ok');
      setTimeout(() => setStatus('', ''), 1500);
      refresh();
    });

    groupEl.addEventListener('change', refresh);
    refresh();
    setInterval(refresh, REFRESH_MS);
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_lists_choices_and_refresh_interval() {
        let html = render_index(&["😊", "😠"], 60);
        assert!(html.contains(r#"<option value="😊" selected>😊</option>"#));
        assert!(html.contains(r#"<option value="😠">😠</option>"#));
        assert!(html.contains("const REFRESH_MS = 60000;"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn choices_are_escaped() {
        let html = render_index(&["<b>"], 1);
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn grouped_view_is_labelled_by_date() {
        let c = captions(ViewKind::ByDay);
        assert_eq!(c.x_label, "Date");
        assert_eq!(c.section, Some("Grouped Mood Counts by Day"));
        assert_eq!(captions(ViewKind::Today).header, "Today's Mood Trends");
    }
}
