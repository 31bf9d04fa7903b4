pub const DASHBOARD_HTML: &str = r#"
<!doctype html>
<html lang="en" class="h-full">

<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Cambridge Life Sciences and Technology Companies</title>

  <script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4"></script>
  <style type="text/tailwindcss">
    @theme {
      --color-atlas-ink: #2c3e50;
      --color-atlas-accent: #3498db;
      --color-atlas-muted: #666666;
    }

    @layer base {
      html { @apply h-full; }
      body { @apply min-h-full bg-slate-50 text-atlas-ink font-sans; }
      [x-cloak] { display: none !important; }
      #map { @apply h-[600px] w-full rounded-lg shadow; }
    }

    @layer components {
      .atlas-label { @apply mb-1 block text-sm font-bold; }
      .atlas-input { @apply w-full rounded-md border border-slate-300 bg-white px-3 py-2 text-sm; }
      .atlas-hover { white-space: pre-line; max-width: 320px; }
    }
  </style>

  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css" crossorigin="anonymous"
    referrerpolicy="no-referrer" />
  <script src="https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js" crossorigin="anonymous"
    referrerpolicy="no-referrer"></script>
  <script defer src="https://cdn.jsdelivr.net/npm/alpinejs@3.13.5/dist/cdn.min.js" crossorigin="anonymous"></script>
</head>

<body>
  <main x-data="atlasApp()" x-init="init()" class="mx-auto max-w-7xl p-6">
    <h1 class="mb-8 text-center text-3xl font-semibold">Cambridge Life Sciences and Technology Companies</h1>

    <section class="mb-8 flex flex-wrap items-start gap-6">
      <div class="w-full md:w-[30%]">
        <label class="atlas-label" for="business-type-filter">Filter by Business Type:</label>
        <select id="business-type-filter" class="atlas-input" x-model="category"
          @change="send({type: 'category_changed', category})">
          <template x-for="option in (view ? view.category_options : [])" :key="option.value">
            <option :value="option.value" x-text="option.label" :selected="option.value === category"></option>
          </template>
        </select>
      </div>

      <div class="w-full md:w-[40%]">
        <label class="atlas-label" for="company-search">Search Companies:</label>
        <input id="company-search" type="text" class="atlas-input" placeholder="Enter company name..."
          x-model="searchText" @input="send({type: 'search_changed', text: searchText})" />
      </div>

      <div class="w-full md:w-[25%]">
        <span class="atlas-label">Companies Found:</span>
        <div id="company-count" class="text-lg" x-text="view ? view.count_label : 'Loading...'"></div>
      </div>
    </section>

    <div class="mb-2 flex justify-end">
      <button type="button" class="text-sm text-atlas-accent underline" @click="send({type: 'reset_viewport'})">
        Reset map view
      </button>
    </div>
    <div id="map"></div>

    <p x-cloak x-show="error" class="mt-4 rounded bg-red-100 px-4 py-2 text-sm text-red-800" x-text="error"></p>

    <div id="modal-overlay" x-cloak x-show="view && view.overlay.visible"
      class="fixed inset-0 z-[1000] flex items-center justify-center bg-black/50">
      <div class="relative max-h-[80vh] w-full max-w-[600px] overflow-auto rounded-xl bg-white p-8 shadow-lg"
        @click.outside="send({type: 'close_overlay'})">
        <button id="close-modal" type="button" aria-label="Close"
          class="absolute right-4 top-2 cursor-pointer border-none bg-transparent text-2xl font-bold text-atlas-muted"
          @click="send({type: 'close_overlay'})">&times;</button>
        <template x-if="view && view.overlay.content">
          <div id="modal-content">
            <h2 class="mb-4 mr-8 text-2xl font-semibold" x-text="view.overlay.content.title"></h2>
            <div class="mb-2"><strong>Business Type: </strong><span x-text="view.overlay.content.business_type"></span></div>
            <div class="mb-2"><strong>Address: </strong><span x-text="view.overlay.content.address"></span></div>
            <template x-if="view.overlay.content.year_established !== undefined">
              <div class="mb-2"><strong>Year Established: </strong><span x-text="view.overlay.content.year_established"></span></div>
            </template>
            <template x-if="view.overlay.content.description !== undefined">
              <div class="mb-4"><strong>Description: </strong><span x-text="view.overlay.content.description"></span></div>
            </template>
            <template x-if="view.overlay.content.website">
              <a class="mt-2 inline-block rounded-md bg-atlas-accent px-6 py-3 font-bold text-white no-underline"
                :href="view.overlay.content.website.href" :target="view.overlay.content.website.target"
                rel="noopener noreferrer" x-text="view.overlay.content.website.label"></a>
            </template>
          </div>
        </template>
      </div>
    </div>
  </main>

  <script>
    function atlasApp() {
      return {
        sessionId: null,
        view: null,
        category: 'All',
        searchText: '',
        error: null,
        map: null,
        markerLayer: null,
        appliedEpoch: null,
        applyingViewport: false,
        queue: Promise.resolve(),
        source: null,

        async init() {
          this.initMap();
          try {
            const res = await fetch('/api/sessions', {method: 'POST'});
            if (!res.ok) throw new Error(`session request failed (${res.status})`);
            const body = await res.json();
            this.sessionId = body.session_id;
            this.render(body.view);
            this.subscribe();
          } catch (err) {
            this.error = String(err);
          }
          window.addEventListener('pagehide', () => {
            if (this.source) this.source.close();
            if (this.sessionId) {
              fetch(`/api/sessions/${this.sessionId}`, {method: 'DELETE', keepalive: true});
            }
          });
        },

        subscribe() {
          this.source = new EventSource(`/api/sessions/${this.sessionId}/stream`);
          this.source.onmessage = (event) => {
            const view = JSON.parse(event.data);
            if (!this.view || view.revision > this.view.revision) this.render(view);
          };
          this.source.addEventListener('closed', () => {
            this.source.close();
            this.error = 'Session expired; reload the page to start a new one.';
          });
        },

        initMap() {
          if (!window.L || typeof L.map !== 'function') throw new Error('Leaflet core unavailable');
          this.map = L.map('map', {zoomControl: false, preferCanvas: true});
          L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
            maxZoom: 19,
            attribution: '&copy; OpenStreetMap contributors'
          }).addTo(this.map);
          L.control.zoom({position: 'bottomright'}).addTo(this.map);
          this.markerLayer = L.layerGroup().addTo(this.map);

          this.map.on('click', () => this.send({type: 'background_clicked'}));
          this.map.on('moveend', () => {
            if (this.applyingViewport || !this.sessionId) return;
            const center = this.map.getCenter();
            this.send({
              type: 'viewport_changed',
              viewport: {center: {lat: center.lat, lon: center.lng}, zoom: Math.round(this.map.getZoom())}
            });
          });
        },

        // Events are posted strictly one after another so the server sees them in order.
        send(events) {
          if (!this.sessionId) return this.queue;
          this.queue = this.queue.then(async () => {
            try {
              const res = await fetch(`/api/sessions/${this.sessionId}/events`, {
                method: 'POST',
                headers: {'Content-Type': 'application/json'},
                body: JSON.stringify(events)
              });
              const body = await res.json();
              if (!res.ok) {
                this.error = body.error || `request failed (${res.status})`;
                return;
              }
              this.error = null;
              if (!this.view || body.revision >= this.view.revision) this.render(body);
            } catch (err) {
              this.error = String(err);
            }
          });
          return this.queue;
        },

        render(view) {
          this.view = view;
          this.category = view.filters.category;
          this.applyViewport(view.map);
          this.drawMarkers(view.map.markers);
        },

        applyViewport(mapView) {
          if (this.appliedEpoch === mapView.viewport_epoch) return;
          this.appliedEpoch = mapView.viewport_epoch;
          this.applyingViewport = true;
          try {
            const {center, zoom} = mapView.viewport;
            this.map.setView([center.lat, center.lon], zoom, {animate: false});
          } finally {
            this.applyingViewport = false;
          }
        },

        drawMarkers(markers) {
          this.markerLayer.clearLayers();
          for (const marker of markers) {
            const hover = document.createElement('div');
            hover.className = 'atlas-hover';
            const [title, ...rest] = marker.hover.split('\n');
            const strong = document.createElement('strong');
            strong.textContent = title;
            hover.appendChild(strong);
            hover.appendChild(document.createTextNode(rest.length ? '\n' + rest.join('\n') : ''));

            const layer = L.circleMarker([marker.position.lat, marker.position.lon], {
              radius: marker.size / 2,
              color: marker.color,
              fillColor: marker.color,
              weight: 1,
              opacity: marker.opacity,
              fillOpacity: marker.opacity
            });
            layer.bindTooltip(hover, {direction: 'top', sticky: true});
            layer.on('click', (event) => {
              L.DomEvent.stopPropagation(event);
              this.send({type: 'marker_clicked', record_id: marker.record_id});
            });
            layer.addTo(this.markerLayer);
          }
        }
      };
    }
  </script>
</body>

</html>
"#;
