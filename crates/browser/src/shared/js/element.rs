pub const CHECK_ELEMENT_STATE: &str = r#"
(selector) => {
    const el = document.querySelector(selector);
    if (!el) return { exists: false };

    const rect = el.getBoundingClientRect();
    const style = window.getComputedStyle(el);
    const isVisible = rect.width > 0 && rect.height > 0 &&
                     style.visibility !== 'hidden' && style.display !== 'none';

    if (!isVisible) return { exists: true, visible: false };

    el.scrollIntoView({ behavior: 'instant', block: 'center' });
    const box = el.getBoundingClientRect();
    const topEl = document.elementFromPoint(box.left + box.width / 2, box.top + box.height / 2);
    const isObscured = topEl && !el.contains(topEl) && topEl !== el &&
                       !(el.htmlFor && topEl.id === el.htmlFor);

    return {
        exists: true,
        visible: isVisible,
        obscured: isObscured,
        obscuredBy: isObscured ? (topEl.tagName + (topEl.className ? '.' + String(topEl.className).split(' ').join('.') : '')) : null,
        disabled: el.disabled || el.getAttribute('aria-disabled') === 'true'
    };
}
"#;

pub const SAFE_CLICK: &str = r#"
(selector) => {
    const el = document.querySelector(selector);
    if (!el) return { success: false, error: 'Element not found' };
    el.click();
    return { success: true };
}
"#;

pub const COUNT: &str = r#"
(selector) => document.querySelectorAll(selector).length
"#;

/// Resolves to `null` when there is no match at `index`.
pub const TEXT_AT: &str = r#"
(selector, index, inner) => {
    const el = document.querySelectorAll(selector)[index];
    if (!el) return null;
    return inner ? el.innerText : el.textContent;
}
"#;

pub const ATTR_AT: &str = r#"
(selector, index, attr) => {
    const el = document.querySelectorAll(selector)[index];
    if (!el) return { exists: false };
    return { exists: true, value: el.getAttribute(attr) };
}
"#;
