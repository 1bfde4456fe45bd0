//! The injection widget script.
//!
//! Emits the dependency-free IIFE a host page executes after loading
//! `/api/load-bar-script`. The script fetches the bar's configuration, builds
//! the banner DOM, runs the one-second countdown and tears itself down on
//! expiry or dismissal. Its logic mirrors the pure modules in this crate:
//! child ordering per [`crate::layout::layout_order`], time arithmetic per
//! [`crate::countdown`], and the shared style-resolution rules from
//! [`crate::render`].
//!
//! Failure policy: the emitted script must never break a host page. Every
//! failure path (transport error, error payload, missing message, stale
//! deadline) logs to the console and leaves the DOM untouched.

/// Prefix on every console line the widget emits.
pub const CONSOLE_PREFIX: &str = "ZoomBar";

/// Escape a value for embedding inside a single-quoted JS string literal.
/// Also neutralizes `</` so the output can sit inside an inline `<script>`.
pub fn js_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\x3C"),
            c => out.push(c),
        }
    }
    out
}

/// A syntactically valid script whose only effect is a console.error. Served
/// for malformed embeds so a broken snippet degrades to a log line instead of
/// a host-page exception.
pub fn error_script(reason: &str) -> String {
    format!(
        "console.error('{}: {}');",
        CONSOLE_PREFIX,
        js_escape(reason)
    )
}

/// Generate the widget script for one bar. `bar_id` and `user_id` are baked
/// into the text as constants; `base_url` qualifies the config endpoint so
/// the fetch works from any origin.
pub fn widget_script(bar_id: &str, user_id: &str, base_url: &str) -> String {
    let config_url = format!(
        "{}/api/get-announcement-bar?barId={}&userId={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(bar_id),
        urlencoding::encode(user_id)
    );
    let container_id = js_escape(&format!("zoombar-container-{}", bar_id));
    let config_url = js_escape(&config_url);
    let bar_id = js_escape(bar_id);

    format!(
        r#"(function() {{
  // Run once per bar id per page load.
  if (document.getElementById('{container_id}')) {{
    return;
  }}

  var container = document.createElement('div');
  container.id = '{container_id}';

  var timerInterval = null;
  var removed = false;
  var addedPadding = 0;

  function removeBar() {{
    if (removed) {{
      return;
    }}
    removed = true;
    if (timerInterval) {{
      clearInterval(timerInterval);
      timerInterval = null;
    }}
    var bar = container.firstChild;
    if (bar) {{
      bar.style.transform = 'translateY(-150%)';
    }}
    if (addedPadding > 0) {{
      var current = parseFloat(document.body.style.paddingTop) || 0;
      document.body.style.paddingTop = Math.max(0, current - addedPadding) + 'px';
      addedPadding = 0;
    }}
    setTimeout(function() {{
      if (container.parentNode) {{
        container.parentNode.removeChild(container);
      }}
    }}, 300);
  }}

  fetch('{config_url}')
    .then(function(response) {{
      if (!response.ok) {{
        throw new Error('Unexpected status ' + response.status);
      }}
      return response.json();
    }})
    .then(function(data) {{
      if (data && data.error) {{
        console.warn('{prefix}: could not load bar {bar_id}: ' + data.error);
        return;
      }}
      if (!data || !data.message) {{
        console.warn('{prefix}: bar {bar_id} has no message to display.');
        return;
      }}
      if (data.expiresAt) {{
        // Stale deadline: never render, rather than render-then-remove.
        if (new Date(data.expiresAt).getTime() <= Date.now()) {{
          console.log('{prefix}: bar {bar_id} has expired.');
          return;
        }}
      }}

      var fontSize = (data.fontSize || 14) + 'px';
      var textColor = data.textColor || '#ffffff';
      var isRTL = (document.documentElement.getAttribute('dir') || '').toLowerCase() === 'rtl';
      var timerPosition = data.timerPosition || 'right';
      var key;

      var bar = document.createElement('div');
      var barStyles = {{
        backgroundColor: data.backgroundColor || '#333333',
        color: textColor,
        padding: '10px 15px',
        position: 'fixed',
        top: '0',
        left: '0',
        width: '100%',
        zIndex: '999999',
        boxSizing: 'border-box',
        lineHeight: '1.5',
        fontFamily: 'sans-serif',
        boxShadow: '0 2px 8px rgba(0,0,0,0.2)',
        transition: 'transform 0.3s ease-out',
        transform: 'translateY(-150%)',
        display: 'flex',
        alignItems: 'center',
        justifyContent: 'space-between',
        gap: '15px'
      }};
      for (key in barStyles) {{
        bar.style[key] = barStyles[key];
      }}

      var messageWrapper = document.createElement('div');
      messageWrapper.style.display = 'flex';
      messageWrapper.style.alignItems = 'center';
      messageWrapper.style.gap = '10px';
      messageWrapper.style.flexGrow = '1';
      messageWrapper.style.justifyContent = isRTL ? 'flex-end' : 'flex-start';

      if (data.imageUrl) {{
        var img = document.createElement('img');
        img.src = data.imageUrl;
        img.alt = '';
        img.style.height = '32px';
        img.style.width = 'auto';
        img.style.maxHeight = '32px';
        img.style.verticalAlign = 'middle';
        img.style.borderRadius = '4px';
        messageWrapper.appendChild(img);
      }}

      var text = document.createElement('span');
      text.textContent = data.message;
      text.style.fontSize = fontSize;
      messageWrapper.appendChild(text);

      // CTA renders only when both fields are present; the config provider
      // validates upstream but this script cannot trust that.
      if (data.ctaText && data.ctaLink) {{
        var cta = document.createElement('a');
        cta.href = data.ctaLink;
        cta.target = data.ctaLinkTarget || '_self';
        cta.rel = 'noopener';
        cta.textContent = data.ctaText;
        var ctaStyles = {{
          backgroundColor: data.ctaBackgroundColor || '#FC4C1D',
          color: data.ctaTextColor || '#FFFFFF',
          padding: '6px 12px',
          borderRadius: '4px',
          textDecoration: 'none',
          fontSize: fontSize,
          fontWeight: '500',
          whiteSpace: 'nowrap'
        }};
        for (key in ctaStyles) {{
          cta.style[key] = ctaStyles[key];
        }}
        messageWrapper.appendChild(cta);
      }}

      var timerWrapper = null;
      if (data.expiresAt) {{
        timerWrapper = document.createElement('div');
        timerWrapper.style.display = 'flex';
        timerWrapper.style.gap = '5px';
        timerWrapper.style.alignItems = 'center';
        // Digits read in fixed numeral order even in RTL documents.
        timerWrapper.style.direction = 'ltr';

        var targetMs = new Date(data.expiresAt).getTime();

        var makeBox = function(label) {{
          var box = document.createElement('div');
          var styles = {{
            display: 'flex',
            flexDirection: 'column',
            alignItems: 'center',
            justifyContent: 'center',
            minWidth: '45px',
            textAlign: 'center',
            lineHeight: '1.2',
            padding: '5px 8px',
            borderRadius: '4px',
            backgroundColor: data.timerBackgroundColor || '#FC4C1D',
            color: data.timerTextColor || '#FFFFFF'
          }};
          if (data.timerStyle === 'circle') {{
            styles.borderRadius = '50%';
            styles.minWidth = '50px';
            styles.height = '50px';
          }} else if (data.timerStyle === 'none') {{
            // No box to contrast against: digits take the bar's text color.
            styles.backgroundColor = 'transparent';
            styles.color = textColor;
            styles.padding = '0';
            styles.minWidth = 'auto';
          }}
          var k;
          for (k in styles) {{
            box.style[k] = styles[k];
          }}
          var value = document.createElement('span');
          value.style.fontSize = '1.1em';
          value.style.fontWeight = 'bold';
          box.appendChild(value);
          var unit = document.createElement('span');
          unit.style.fontSize = '0.7em';
          unit.textContent = label;
          box.appendChild(unit);
          return {{ box: box, value: value }};
        }};

        var days = makeBox('days');
        var hours = makeBox('hours');
        var minutes = makeBox('minutes');
        var seconds = makeBox('seconds');
        timerWrapper.appendChild(days.box);
        timerWrapper.appendChild(hours.box);
        timerWrapper.appendChild(minutes.box);
        timerWrapper.appendChild(seconds.box);

        var pad = function(n) {{
          return String(n).padStart(2, '0');
        }};

        var updateTimer = function() {{
          // Recompute from the wall clock against the fixed target each tick;
          // decrementing a counter would drift with timer imprecision.
          var remaining = targetMs - Date.now();
          if (remaining < 0) {{
            if (timerInterval) {{
              clearInterval(timerInterval);
              timerInterval = null;
            }}
            days.value.textContent = '00';
            hours.value.textContent = '00';
            minutes.value.textContent = '00';
            seconds.value.textContent = '00';
            removeBar();
            return;
          }}
          var d = Math.floor(remaining / 86400000);
          var h = Math.floor((remaining % 86400000) / 3600000);
          var m = Math.floor((remaining % 3600000) / 60000);
          var s = Math.floor((remaining % 60000) / 1000);
          hours.value.textContent = pad(h);
          minutes.value.textContent = pad(m);
          seconds.value.textContent = pad(s);
          if (d > 0) {{
            days.value.textContent = pad(d);
            if (!days.box.parentNode) {{
              timerWrapper.insertBefore(days.box, timerWrapper.firstChild);
            }}
          }} else if (days.box.parentNode) {{
            // Splice out rather than hide, so a stale "00 days" never shows.
            timerWrapper.removeChild(days.box);
          }}
        }};
        updateTimer();
        timerInterval = setInterval(updateTimer, 1000);
      }}

      var closeButton = document.createElement('button');
      closeButton.innerHTML = '&times;';
      closeButton.setAttribute('aria-label', 'Dismiss announcement');
      closeButton.style.background = 'transparent';
      closeButton.style.border = 'none';
      closeButton.style.color = textColor;
      closeButton.style.fontSize = '20px';
      closeButton.style.cursor = 'pointer';
      closeButton.style.padding = '0 5px';
      closeButton.style.lineHeight = '1';
      closeButton.style.opacity = '0.7';
      closeButton.onmouseover = function() {{
        this.style.opacity = '1';
      }};
      closeButton.onmouseout = function() {{
        this.style.opacity = '0.7';
      }};
      closeButton.onclick = removeBar;

      // Close sits on the trailing visual edge: first in DOM order under RTL,
      // last under LTR. timerPosition picks which side of the message the
      // countdown lands on.
      var ordered = [];
      if (isRTL) {{
        ordered.push(closeButton);
      }}
      if (timerPosition === 'left') {{
        if (timerWrapper) {{
          ordered.push(timerWrapper);
        }}
        ordered.push(messageWrapper);
      }} else {{
        ordered.push(messageWrapper);
        if (timerWrapper) {{
          ordered.push(timerWrapper);
        }}
      }}
      if (!isRTL) {{
        ordered.push(closeButton);
      }}
      for (var i = 0; i < ordered.length; i++) {{
        bar.appendChild(ordered[i]);
      }}

      container.appendChild(bar);

      var attach = function() {{
        if (!document.body) {{
          window.addEventListener('DOMContentLoaded', attach, {{ once: true }});
          return;
        }}
        document.body.insertBefore(container, document.body.firstChild);
        // Track exactly the spacing we add so teardown can reverse exactly
        // that amount, coexisting with other scripts that touch padding.
        addedPadding = bar.offsetHeight;
        var current = parseFloat(document.body.style.paddingTop) || 0;
        document.body.style.paddingTop = (current + addedPadding) + 'px';
        // Attached off-screen; slide in once the host layout settles.
        setTimeout(function() {{
          bar.style.transform = 'translateY(0)';
        }}, 50);
      }};
      attach();
    }})
    .catch(function(err) {{
      console.error('{prefix}: error fetching bar {bar_id}:', err);
    }});
}})();
"#,
        container_id = container_id,
        config_url = config_url,
        bar_id = bar_id,
        prefix = CONSOLE_PREFIX,
    )
}

// ============================================================================
// Tests
// ============================================================================
